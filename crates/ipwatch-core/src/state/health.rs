// # Health Tracker
//
// Persists the time of the last liveness notification and decides when the
// next one is due.
//
// ## File Format
//
// A single ISO-8601 local timestamp, overwritten in place:
//
// ```text
// 2025-07-24T10:30:15.123456
// ```

use chrono::{DateTime, Local, NaiveDateTime};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::Outcome;
use crate::Error;

/// Format written to the checkpoint file
const CHECKPOINT_WRITE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Format accepted when reading (fraction optional)
const CHECKPOINT_READ_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// File-backed health checkpoint
#[derive(Debug, Clone)]
pub struct HealthTracker {
    path: PathBuf,
}

impl HealthTracker {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time of the last health notification, if one was recorded
    ///
    /// An unreadable or unparseable checkpoint is reported and treated as
    /// absent.
    pub async fn last_sent(&self) -> Option<NaiveDateTime> {
        if !self.path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(
                    "Error reading health check file {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        match parse_checkpoint(&content) {
            Ok(timestamp) => Some(timestamp),
            Err(e) => {
                tracing::error!("Error reading health check file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Whether a health notification is due now
    pub async fn is_due(&self, interval: chrono::Duration) -> bool {
        self.is_due_at(interval, Local::now().naive_local()).await
    }

    /// Whether a health notification is due at `now`
    ///
    /// Due when no checkpoint exists or at least `interval` has elapsed
    /// since it.
    pub async fn is_due_at(&self, interval: chrono::Duration, now: NaiveDateTime) -> bool {
        match self.last_sent().await {
            None => true,
            Some(last) => now.signed_duration_since(last) >= interval,
        }
    }

    /// Record that a health notification was sent now
    pub async fn mark_sent(&self) -> Outcome<()> {
        self.mark_sent_at(Local::now().naive_local()).await
    }

    /// Record that a health notification was sent at `now`
    pub async fn mark_sent_at(&self, now: NaiveDateTime) -> Outcome<()> {
        let content = now.format(CHECKPOINT_WRITE_FORMAT).to_string();

        match fs::write(&self.path, content).await {
            Ok(()) => {
                tracing::debug!("Health checkpoint updated: {}", self.path.display());
                Outcome::Success(())
            }
            Err(e) => Outcome::Recoverable(Error::log_io(format!(
                "Error updating health check file {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}

/// Parse a checkpoint written by this tracker or any ISO-8601 writer
fn parse_checkpoint(content: &str) -> Result<NaiveDateTime, Error> {
    let content = content.trim();

    if let Ok(timestamp) = NaiveDateTime::parse_from_str(content, CHECKPOINT_READ_FORMAT) {
        return Ok(timestamp);
    }

    DateTime::parse_from_rfc3339(content)
        .map(|dt| dt.with_timezone(&Local).naive_local())
        .map_err(|e| Error::log_io(format!("Invalid checkpoint timestamp '{}': {}", content, e)))
}
