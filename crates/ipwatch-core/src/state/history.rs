// # History Log
//
// Append-only record of observed external addresses.
//
// ## File Format
//
// One observation per line:
//
// ```text
// 2025-07-24 10:30:15 | 203.0.113.7 | CHANGED
// 2025-07-24 10:45:15 | 203.0.113.7 | CHECKED
// ```
//
// The last line is the most recently known address. Lines are never
// rewritten or removed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::Outcome;
use crate::Error;

/// Timestamp format of a log line
const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field separator of a log line
const FIELD_SEPARATOR: &str = " | ";

/// Whether an observation differed from the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObservationStatus {
    /// Address differs from the last known one (or none was known)
    Changed,
    /// Address matches the last known one
    Checked,
}

impl ObservationStatus {
    /// Status for a comparison result
    pub fn from_changed(changed: bool) -> Self {
        if changed {
            ObservationStatus::Changed
        } else {
            ObservationStatus::Checked
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObservationStatus::Changed => "CHANGED",
            ObservationStatus::Checked => "CHECKED",
        }
    }
}

impl fmt::Display for ObservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObservationStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CHANGED" => Ok(ObservationStatus::Changed),
            "CHECKED" => Ok(ObservationStatus::Checked),
            other => Err(Error::log_io(format!("Unknown observation status: {}", other))),
        }
    }
}

/// One line of the history log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub address: String,
    pub status: ObservationStatus,
}

impl Observation {
    /// Create an observation stamped with the current local time
    pub fn now(address: impl Into<String>, status: ObservationStatus) -> Self {
        Self {
            timestamp: chrono::Local::now().naive_local(),
            address: address.into(),
            status,
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.timestamp.format(LINE_TIME_FORMAT),
            FIELD_SEPARATOR,
            self.address,
            FIELD_SEPARATOR,
            self.status
        )
    }
}

impl FromStr for Observation {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = line.trim().split(FIELD_SEPARATOR).collect();
        let [timestamp, address, status] = fields.as_slice() else {
            return Err(Error::log_io(format!(
                "Expected 3 fields, found {}",
                fields.len()
            )));
        };

        let timestamp = NaiveDateTime::parse_from_str(timestamp.trim(), LINE_TIME_FORMAT)
            .map_err(|e| Error::log_io(format!("Bad timestamp '{}': {}", timestamp, e)))?;

        let address = address.trim();
        if address.is_empty() {
            return Err(Error::log_io("Empty address field"));
        }

        Ok(Self {
            timestamp,
            address: address.to_string(),
            status: status.trim().parse()?,
        })
    }
}

/// Append-only history log backed by a text file
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Address of the most recent observation
    ///
    /// A missing file or a malformed last line yields `Success(None)`; the
    /// malformed line is logged as a warning. Trailing blank lines are skipped.
    /// A read failure is `Recoverable`.
    pub async fn load_last(&self) -> Outcome<Option<String>> {
        if !self.path.exists() {
            tracing::debug!("History log does not exist: {}", self.path.display());
            return Outcome::Success(None);
        }

        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                return Outcome::Recoverable(Error::log_io(format!(
                    "Error reading log file {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let Some(last_line) = content.lines().rev().find(|l| !l.trim().is_empty()) else {
            return Outcome::Success(None);
        };

        match last_line.parse::<Observation>() {
            Ok(observation) => Outcome::Success(Some(observation.address)),
            Err(e) => {
                tracing::warn!(
                    "Ignoring malformed last line in {}: '{}' ({})",
                    self.path.display(),
                    last_line,
                    e
                );
                Outcome::Success(None)
            }
        }
    }

    /// Append one observation, creating the file if needed
    ///
    /// Failures are `Recoverable`: the run continues without the entry.
    pub async fn append(&self, address: &str, changed: bool) -> Outcome<()> {
        let observation = Observation::now(address, ObservationStatus::from_changed(changed));
        self.append_observation(&observation).await.into()
    }

    async fn append_observation(&self, observation: &Observation) -> crate::Result<()> {
        let line = format!("{}\n", observation);

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.write_error(e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| self.write_error(e))?;
        file.flush().await.map_err(|e| self.write_error(e))?;

        tracing::info!("Logged: {}", observation);
        Ok(())
    }

    fn write_error(&self, e: std::io::Error) -> Error {
        Error::log_io(format!(
            "Error writing to log file {}: {}",
            self.path.display(),
            e
        ))
    }
}
