// # HTTP Address Resolver
//
// This crate resolves the host's external IP address by asking public
// lookup services over HTTP.
//
// ## Fallback Chain
//
// Services are tried strictly in order. A service that fails (transport
// error, non-2xx status, unparseable body) is logged and skipped; the first
// service that yields an address wins. There are no retries within a service.
//
// ## Response Formats
//
// Each service is paired with an [`AddressFormat`] that knows how to pull the
// address out of its response body, so the resolver itself never needs to
// know which service it is talking to.
//
// | Service                              | Format                                 |
// |--------------------------------------|----------------------------------------|
// | `https://httpbin.org/ip`             | JSON `origin`, first of a comma list   |
// | `https://api.ipify.org?format=json`  | JSON `ip`                              |
// | `https://icanhazip.com`              | plain text                             |

use async_trait::async_trait;
use ipwatch_core::{AddressSource, Error, Result};
use serde_json::Value;
use std::net::IpAddr;
use std::time::Duration;

/// Per-request timeout for lookup services
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Extracts an address from a lookup service's response body
pub trait AddressFormat: Send + Sync {
    /// Pull the address text out of `body`
    fn extract(&self, body: &str) -> Result<String>;
}

/// Body is the bare address, possibly with surrounding whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl AddressFormat for PlainText {
    fn extract(&self, body: &str) -> Result<String> {
        Ok(body.trim().to_string())
    }
}

/// Body is a JSON object carrying the address in a string field
#[derive(Debug, Clone)]
pub struct JsonField {
    field: String,
    first_of_list: bool,
}

impl JsonField {
    /// The field holds exactly one address
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            first_of_list: false,
        }
    }

    /// The field may hold a comma-joined list; the first entry is used
    pub fn first_of_list(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            first_of_list: true,
        }
    }
}

impl AddressFormat for JsonField {
    fn extract(&self, body: &str) -> Result<String> {
        let json: Value = serde_json::from_str(body)
            .map_err(|e| Error::http(format!("Failed to parse response: {}", e)))?;

        let value = json[self.field.as_str()].as_str().ok_or_else(|| {
            Error::http(format!(
                "Invalid response format: {} is not a string",
                self.field
            ))
        })?;

        let value = if self.first_of_list {
            value.split(',').next().unwrap_or_default()
        } else {
            value
        };

        Ok(value.trim().to_string())
    }
}

/// One upstream lookup service
pub struct LookupService {
    url: String,
    format: Box<dyn AddressFormat>,
}

impl LookupService {
    pub fn new(url: impl Into<String>, format: impl AddressFormat + 'static) -> Self {
        Self {
            url: url.into(),
            format: Box::new(format),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Extract and validate the address from a response body
    pub fn parse(&self, body: &str) -> Result<IpAddr> {
        let text = self.format.extract(body)?;
        text.parse()
            .map_err(|_| Error::http(format!("Invalid IP address: {:?}", text)))
    }
}

impl std::fmt::Debug for LookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupService")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// The built-in services, highest priority first
pub fn default_services() -> Vec<LookupService> {
    vec![
        LookupService::new("https://httpbin.org/ip", JsonField::first_of_list("origin")),
        LookupService::new("https://api.ipify.org?format=json", JsonField::new("ip")),
        LookupService::new("https://icanhazip.com", PlainText),
    ]
}

/// Resolves the external address over an ordered list of lookup services
#[derive(Debug)]
pub struct HttpAddressResolver {
    services: Vec<LookupService>,
    client: reqwest::Client,
}

impl HttpAddressResolver {
    /// Create a resolver over [`default_services`]
    pub fn new() -> Result<Self> {
        Self::with_services(default_services())
    }

    /// Create a resolver over custom services with the default timeout
    pub fn with_services(services: Vec<LookupService>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_LOOKUP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(services, client))
    }

    /// Create a resolver with a preconfigured HTTP client
    pub fn with_client(services: Vec<LookupService>, client: reqwest::Client) -> Self {
        Self { services, client }
    }

    pub fn services(&self) -> &[LookupService] {
        &self.services
    }

    /// Query a single service
    async fn query(&self, service: &LookupService) -> Result<IpAddr> {
        let response = self
            .client
            .get(service.url())
            .send()
            .await
            .map_err(|e| Error::http(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::http(format!("HTTP error: {}", response.status())));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("Failed to read response: {}", e)))?;

        service.parse(&body)
    }
}

#[async_trait]
impl AddressSource for HttpAddressResolver {
    async fn current(&self) -> Result<IpAddr> {
        for service in &self.services {
            match self.query(service).await {
                Ok(ip) => {
                    tracing::debug!("Resolved {} via {}", ip, service.url());
                    return Ok(ip);
                }
                Err(e) => {
                    tracing::warn!("Failed to get IP from {}: {}", service.url(), e);
                }
            }
        }

        Err(Error::resolution(format!(
            "Failed to get external IP from all services ({} tried)",
            self.services.len()
        )))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
