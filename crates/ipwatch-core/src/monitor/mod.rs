//! Core IP monitor
//!
//! The Monitor is responsible for one pass per invocation:
//! - Acquiring the external address (or accepting a test address)
//! - Comparing it with the last entry of the history log
//! - Appending the observation
//! - Sending change and health notifications
//!
//! ## Flow
//!
//! ```text
//! ┌───────────────┐     ┌─────────────┐     ┌───────────────┐
//! │ AddressSource │ ──▶ │   Monitor   │ ──▶ │  HistoryLog   │
//! │ (or --ip)     │     └─────────────┘     │ (read/append) │
//! └───────────────┘        │       │        └───────────────┘
//!                          ▼       ▼
//!                  ┌──────────┐ ┌───────────────┐
//!                  │ Notifier │ │ HealthTracker │
//!                  └──────────┘ └───────────────┘
//! ```
//!
//! ## Failure Handling
//!
//! Log and checkpoint I/O failures are recovered locally. Any other failure
//! after the run mode is known ends the run at a single boundary in
//! [`Monitor::run`], which sends a high-priority error notification in
//! normal mode only.

use chrono::{Local, NaiveDateTime};
use tracing::{debug, error, info};

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::mode::RunMode;
use crate::notification::{Notification, Priority};
use crate::state::{HealthTracker, HistoryLog, ObservationStatus};
use crate::traits::{AddressSource, Notifier};

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Address observed in this run
    pub address: Option<String>,

    /// Last known address before this run
    pub previous_address: Option<String>,

    /// Status of the appended observation
    pub status: Option<ObservationStatus>,

    /// Whether a health notification was due (and therefore attempted)
    pub health_check_due: bool,

    /// Titles of the notifications the endpoint accepted
    pub delivered: Vec<String>,
}

impl RunReport {
    /// Whether the address differed from the last known one
    pub fn changed(&self) -> bool {
        self.status == Some(ObservationStatus::Changed)
    }
}

/// Core IP monitor
///
/// ## Lifecycle
///
/// 1. Create with [`Monitor::new()`]
/// 2. Call [`Monitor::run()`] once per invocation
pub struct Monitor {
    /// External address discovery
    source: Box<dyn AddressSource>,

    /// Push notification delivery
    notifier: Box<dyn Notifier>,

    /// Immutable run configuration
    config: MonitorConfig,
}

impl Monitor {
    /// Create a new monitor
    ///
    /// Fails with a configuration error before any I/O happens.
    pub fn new(
        source: Box<dyn AddressSource>,
        notifier: Box<dyn Notifier>,
        config: MonitorConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            source,
            notifier,
            config,
        })
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run one pass in the given mode
    ///
    /// # Returns
    ///
    /// - `Ok(RunReport)`: The pass completed (including no-op health checks)
    /// - `Err(Error)`: The pass failed; in normal mode an error notification
    ///   has already been attempted
    pub async fn run(&self, mode: &RunMode) -> Result<RunReport> {
        info!("Starting IP monitor run (mode={})", mode);

        if *mode == RunMode::HealthCheckOnly {
            return Ok(self.run_health_check_only().await);
        }

        match self.observe(mode).await {
            Ok(report) => Ok(report),
            Err(e) => {
                error!("Error in IP monitoring: {}", e);

                if !mode.is_test() {
                    self.notifier
                        .send(&Notification::run_failed(&e, now()))
                        .await;
                }

                Err(e)
            }
        }
    }

    /// Health-check-only pass: notify if due, otherwise do nothing
    async fn run_health_check_only(&self) -> RunReport {
        let mut report = RunReport::default();

        if !self.health_tracker().is_due(self.config.health.interval()).await {
            info!("Health check not due yet");
            return report;
        }

        report.health_check_due = true;
        self.deliver(&mut report, Notification::health_check(None, now()))
            .await;

        // mark_sent only fails recoverably
        let _ = self.health_tracker().mark_sent().await.recover_with(());

        report
    }

    /// Normal or test pass: acquire, compare, log, notify
    async fn observe(&self, mode: &RunMode) -> Result<RunReport> {
        let is_test = mode.is_test();

        let address = match mode {
            RunMode::Test { address } => {
                info!("Test mode: Using IP {}", address);
                address.clone()
            }
            _ => {
                debug!("Resolving address via {}", self.source.source_name());
                let ip = self.source.current().await?;
                info!("Current external IP: {}", ip);
                ip.to_string()
            }
        };

        let history = self.history_for(mode);
        let previous = history.load_last().await.recover_with(None)?;
        info!("Previous IP: {}", previous.as_deref().unwrap_or("none"));

        let changed = previous.as_deref() != Some(address.as_str());
        history.append(&address, changed).await.recover_with(())?;

        let mut report = RunReport {
            address: Some(address.clone()),
            previous_address: previous.clone(),
            status: Some(ObservationStatus::from_changed(changed)),
            ..RunReport::default()
        };

        if changed {
            let notification = match &previous {
                Some(previous) => {
                    let n = Notification::address_changed(previous, &address, now());
                    if is_test {
                        n.with_priority(Priority::Low)
                    } else {
                        n
                    }
                }
                None => Notification::monitor_started(&address, now()),
            };

            let notification = if is_test {
                notification.into_test()
            } else {
                notification
            };

            self.deliver(&mut report, notification).await;
        } else {
            info!("IP address unchanged");
        }

        if !is_test {
            let tracker = self.health_tracker();
            if tracker.is_due(self.config.health.interval()).await {
                report.health_check_due = true;
                self.deliver(&mut report, Notification::health_check(Some(&address), now()))
                    .await;
                tracker.mark_sent().await.recover_with(())?;
            }
        }

        Ok(report)
    }

    async fn deliver(&self, report: &mut RunReport, notification: Notification) {
        if self.notifier.send(&notification).await {
            report.delivered.push(notification.title);
        }
    }

    /// Normal and test runs keep separate histories
    fn history_for(&self, mode: &RunMode) -> HistoryLog {
        if mode.is_test() {
            HistoryLog::new(&self.config.paths.test_history)
        } else {
            HistoryLog::new(&self.config.paths.history)
        }
    }

    fn health_tracker(&self) -> HealthTracker {
        HealthTracker::new(&self.config.paths.health_checkpoint)
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
