// # ntfy Notifier
//
// This crate publishes monitor notifications to an ntfy server.
//
// ## Request Shape
//
// ```http
// POST {server}/{topic}
// Title: External IP Address Changed
// Priority: default
// Tags: computer,globe_with_meridians
// Content-Type: text/plain; charset=utf-8
// Authorization: Bearer <token>        (or Basic, or absent)
//
// <body>
// ```
//
// ## Security Requirements
//
// - Token and password NEVER appear in logs or Debug output
// - Credentials come from configuration only
//
// ## API Reference
//
// - Publishing: https://docs.ntfy.sh/publish/

use async_trait::async_trait;
use ipwatch_core::{Error, Notification, Notifier, NotifyAuth, NotifyConfig, Result};
use std::time::Duration;

/// Default HTTP timeout for publish requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Tags attached to every notification
pub const NOTIFICATION_TAGS: &str = "computer,globe_with_meridians";

/// Content type of the message body
const CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// ntfy publisher
///
/// One POST per notification; no retries.
///
/// # Security
///
/// The Debug implementation does NOT expose credentials.
pub struct NtfyNotifier {
    /// Publish URL: `{server}/{topic}`
    endpoint: String,

    /// Authentication mode
    /// ⚠️ NEVER log the secrets inside
    auth: NotifyAuth,

    /// HTTP client for publish requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides credentials
impl std::fmt::Debug for NtfyNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NtfyNotifier")
            .field("endpoint", &self.endpoint)
            .field("auth", &self.auth)
            .finish()
    }
}

impl NtfyNotifier {
    /// Create a notifier for the configured endpoint
    pub fn new(config: &NotifyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Self::with_client(config, client)
    }

    /// Create a notifier with a preconfigured HTTP client
    pub fn with_client(config: &NotifyConfig, client: reqwest::Client) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            endpoint: config.endpoint(),
            auth: config.auth.clone(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the publish request for `notification`
    fn request(&self, notification: &Notification) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(&self.endpoint)
            .header("Title", notification.title.as_str())
            .header("Priority", notification.priority.as_str())
            .header("Tags", NOTIFICATION_TAGS)
            .header("Content-Type", CONTENT_TYPE)
            .body(notification.body.clone().into_bytes());

        match &self.auth {
            NotifyAuth::Bearer { token } => request.bearer_auth(token),
            NotifyAuth::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
            NotifyAuth::None => request,
        }
    }
}

#[async_trait]
impl Notifier for NtfyNotifier {
    async fn deliver(&self, notification: &Notification) -> Result<()> {
        tracing::debug!(
            "Publishing '{}' (priority={}) to {}",
            notification.title,
            notification.priority,
            self.endpoint
        );

        let response = self
            .request(notification)
            .send()
            .await
            .map_err(|e| Error::delivery(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());

        match status.as_u16() {
            401 | 403 => Err(Error::delivery(format!(
                "Authentication failed: check NTFY_TOKEN or NTFY_USERNAME/NTFY_PASSWORD. Status: {}",
                status
            ))),
            429 => Err(Error::delivery(format!(
                "Rate limit exceeded. Status: {}",
                status
            ))),
            _ => Err(Error::delivery(format!(
                "Publish failed: {} - {}",
                status,
                error_text.trim()
            ))),
        }
    }

    fn notifier_name(&self) -> &'static str {
        "ntfy"
    }
}
