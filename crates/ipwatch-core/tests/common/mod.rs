//! Test doubles and common utilities for monitor contract tests
//!
//! These doubles stand in for the network-facing components so the
//! monitor's decisions can be observed without HTTP.

#![allow(dead_code)]

use ipwatch_core::error::Result;
use ipwatch_core::{AddressSource, Error, MonitorConfig, Notification, Notifier, PathsConfig};
use std::net::IpAddr;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An AddressSource that always returns the same address
pub struct FixedAddressSource {
    ip: IpAddr,
    call_count: Arc<AtomicUsize>,
}

impl FixedAddressSource {
    pub fn new(ip: &str) -> Self {
        Self {
            ip: ip.parse().expect("valid test address"),
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a source that shares its call counter with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            ip: other.ip,
            call_count: Arc::clone(&other.call_count),
        }
    }

    /// Get the number of times current() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AddressSource for FixedAddressSource {
    async fn current(&self) -> Result<IpAddr> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// An AddressSource whose every upstream has failed
pub struct FailingAddressSource;

#[async_trait::async_trait]
impl AddressSource for FailingAddressSource {
    async fn current(&self) -> Result<IpAddr> {
        Err(Error::resolution(
            "Failed to get external IP from all services",
        ))
    }

    fn source_name(&self) -> &'static str {
        "failing"
    }
}

/// A Notifier that records every notification it is asked to deliver
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    reject: Arc<AtomicBool>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            reject: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a notifier that shares its record with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            sent: Arc::clone(&other.sent),
            reject: Arc::clone(&other.reject),
        }
    }

    /// Make every subsequent delivery fail
    pub fn reject_all(&self) {
        self.reject.store(true, Ordering::SeqCst);
    }

    /// All notifications handed to deliver(), in order
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    /// Titles of all notifications handed to deliver(), in order
    pub fn titles(&self) -> Vec<String> {
        self.sent().into_iter().map(|n| n.title).collect()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        self.sent.lock().unwrap().push(notification.clone());

        if self.reject.load(Ordering::SeqCst) {
            return Err(Error::delivery("HTTP error: 500 Internal Server Error"));
        }
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// A configuration whose files all live in `dir`
pub fn config_in(dir: &Path) -> MonitorConfig {
    let mut config = MonitorConfig::new("test-topic");
    config.paths = PathsConfig::in_dir(dir);
    config
}

/// Write a history log whose last entry is `ip`
pub fn seed_history(path: &Path, ip: &str) {
    std::fs::write(path, format!("2025-07-24 10:30:15 | {} | CHANGED\n", ip))
        .expect("seed history log");
}

/// Mark the health check as sent just now so it is not due
pub fn seed_recent_health_check(path: &Path) {
    let now = chrono::Local::now().naive_local();
    std::fs::write(path, now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
        .expect("seed health checkpoint");
}

/// Read the history log as lines
pub fn history_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
