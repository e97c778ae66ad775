//! Notification messages
//!
//! Notifications are transient: they are built by the monitor, handed to a
//! [`crate::Notifier`], and dropped.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp format used in notification bodies
const BODY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Title of the address change notification
pub const TITLE_CHANGED: &str = "External IP Address Changed";
/// Title of the first-observation notification
pub const TITLE_STARTED: &str = "External IP Monitor Started";
/// Title of the periodic liveness notification
pub const TITLE_HEALTH: &str = "IP Monitor Health Check";
/// Title of the run failure notification
pub const TITLE_ERROR: &str = "IP Monitor Error";

/// Delivery priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Default,
    High,
}

impl Priority {
    /// Wire name (ntfy priority header value)
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Default => "default",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A human-readable push notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub priority: Priority,
}

impl Notification {
    /// Create a notification
    pub fn new(title: impl Into<String>, body: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            priority,
        }
    }

    /// The external address moved from `previous` to `current`
    pub fn address_changed(previous: &str, current: &str, at: NaiveDateTime) -> Self {
        Self::new(
            TITLE_CHANGED,
            format!(
                "Your external IP address has changed:\n\nPrevious: {}\nCurrent: {}\n\nTime: {}",
                previous,
                current,
                at.format(BODY_TIME_FORMAT)
            ),
            Priority::Default,
        )
    }

    /// First observation ever recorded
    pub fn monitor_started(current: &str, at: NaiveDateTime) -> Self {
        Self::new(
            TITLE_STARTED,
            format!(
                "IP monitoring has started.\n\nCurrent IP: {}\n\nTime: {}",
                current,
                at.format(BODY_TIME_FORMAT)
            ),
            Priority::Low,
        )
    }

    /// Periodic liveness signal, optionally carrying the current address
    pub fn health_check(current: Option<&str>, at: NaiveDateTime) -> Self {
        let body = match current {
            Some(ip) => format!(
                "External IP Monitor is running normally.\n\nCurrent IP: {}\nLast check: {}",
                ip,
                at.format(BODY_TIME_FORMAT)
            ),
            None => format!(
                "External IP Monitor is running normally.\nLast check: {}",
                at.format(BODY_TIME_FORMAT)
            ),
        };
        Self::new(TITLE_HEALTH, body, Priority::Low)
    }

    /// The run failed
    pub fn run_failed(error: &crate::Error, at: NaiveDateTime) -> Self {
        Self::new(
            TITLE_ERROR,
            format!(
                "An error occurred while monitoring IP:\n\nError in IP monitoring: {}\n\nTime: {}",
                error,
                at.format(BODY_TIME_FORMAT)
            ),
            Priority::High,
        )
    }

    /// Override the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Mark as produced by a test run
    pub fn into_test(mut self) -> Self {
        self.title = format!("[TEST] {}", self.title);
        self
    }
}
