//! Configuration types for the IP monitor
//!
//! A [`MonitorConfig`] is built once at process start and passed by
//! reference into every component.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default ntfy server
pub const DEFAULT_NTFY_SERVER: &str = "https://ntfy.sh";

/// Default interval between health notifications, in hours
pub const DEFAULT_HEALTH_CHECK_INTERVAL_HOURS: u64 = 24;

/// Default directory for the history logs and checkpoint
pub const DEFAULT_LOGS_DIR: &str = "logs";

/// Main monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Push notification endpoint
    pub notify: NotifyConfig,

    /// Health check settings
    #[serde(default)]
    pub health: HealthConfig,

    /// Persisted file locations
    #[serde(default)]
    pub paths: PathsConfig,
}

impl MonitorConfig {
    /// Create a configuration for `topic` with every other setting at its default
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            notify: NotifyConfig::new(topic),
            health: HealthConfig::default(),
            paths: PathsConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.notify.validate()?;
        self.health.validate()?;
        Ok(())
    }
}

/// ntfy endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Server base URL (e.g. "https://ntfy.sh")
    #[serde(default = "default_server")]
    pub server: String,

    /// Topic to publish to
    pub topic: String,

    /// Authentication mode
    #[serde(default)]
    pub auth: NotifyAuth,
}

impl NotifyConfig {
    /// Create an unauthenticated configuration on the default server
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            server: default_server(),
            topic: topic.into(),
            auth: NotifyAuth::None,
        }
    }

    /// Set the server base URL
    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    /// Set the authentication mode
    pub fn with_auth(mut self, auth: NotifyAuth) -> Self {
        self.auth = auth;
        self
    }

    /// Publish URL: `{server}/{topic}`
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.server.trim_end_matches('/'), self.topic)
    }

    /// Validate the endpoint configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.topic.trim().is_empty() {
            return Err(crate::Error::config("NTFY_TOPIC is required"));
        }
        if self.server.is_empty() {
            return Err(crate::Error::config("ntfy server URL cannot be empty"));
        }
        if !self.server.starts_with("https://") && !self.server.starts_with("http://") {
            return Err(crate::Error::config(format!(
                "ntfy server must use HTTP or HTTPS scheme. Got: {}",
                self.server
            )));
        }
        Ok(())
    }
}

/// How the notifier authenticates against the ntfy server
///
/// The variants are exclusive: a bearer token always wins over
/// username/password (see [`NotifyAuth::from_parts`]).
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotifyAuth {
    /// No credentials (public topics)
    #[default]
    None,
    /// `Authorization: Bearer <token>`
    Bearer {
        /// Access token
        token: String,
    },
    /// HTTP basic authentication
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
}

impl NotifyAuth {
    /// Pick the authentication mode from optional credentials
    ///
    /// Empty strings count as absent. Basic auth requires both halves.
    pub fn from_parts(
        token: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        let present = |v: Option<String>| v.filter(|s| !s.is_empty());

        if let Some(token) = present(token) {
            return NotifyAuth::Bearer { token };
        }

        match (present(username), present(password)) {
            (Some(username), Some(password)) => NotifyAuth::Basic { username, password },
            _ => NotifyAuth::None,
        }
    }

    /// Whether any credentials are configured
    pub fn is_configured(&self) -> bool {
        !matches!(self, NotifyAuth::None)
    }
}

// Credentials never reach logs
impl std::fmt::Debug for NotifyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyAuth::None => f.write_str("None"),
            NotifyAuth::Bearer { .. } => f
                .debug_struct("Bearer")
                .field("token", &"<REDACTED>")
                .finish(),
            NotifyAuth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<REDACTED>")
                .finish(),
        }
    }
}

/// Health check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Minimum hours between two health notifications
    #[serde(default = "default_interval_hours")]
    pub interval_hours: u64,
}

impl HealthConfig {
    /// Validate the health settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.interval_hours == 0 {
            return Err(crate::Error::config(
                "HEALTH_CHECK_INTERVAL_HOURS must be > 0",
            ));
        }
        Ok(())
    }

    /// The interval as a duration
    pub fn interval(&self) -> chrono::Duration {
        i64::try_from(self.interval_hours)
            .ok()
            .and_then(chrono::TimeDelta::try_hours)
            .unwrap_or(chrono::TimeDelta::MAX)
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            interval_hours: default_interval_hours(),
        }
    }
}

/// Locations of the persisted files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// History log for normal runs
    pub history: PathBuf,

    /// History log for test runs
    pub test_history: PathBuf,

    /// Last health check timestamp
    pub health_checkpoint: PathBuf,
}

impl PathsConfig {
    /// Standard file names inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            history: dir.join("ip_history.txt"),
            test_history: dir.join("test_ip_history.txt"),
            health_checkpoint: dir.join("last_health_check.txt"),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_LOGS_DIR)
    }
}

fn default_server() -> String {
    DEFAULT_NTFY_SERVER.to_string()
}

fn default_interval_hours() -> u64 {
    DEFAULT_HEALTH_CHECK_INTERVAL_HOURS
}
