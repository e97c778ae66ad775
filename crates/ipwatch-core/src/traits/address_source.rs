// # Address Source Trait
//
// Defines the interface for discovering the host's external IP address.
//
// ## Implementations
//
// - HTTP lookup services with fallback: `ipwatch-resolver-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ipwatch_core::AddressSource;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let source = /* AddressSource implementation */;
//
//     let ip = source.current().await?;
//     println!("External IP: {}", ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::net::IpAddr;

/// Trait for external address discovery
///
/// A single call performs one full lookup. Implementations may try several
/// upstream services internally, but must not retry a service or sleep
/// between attempts.
///
/// # Errors
///
/// `current()` fails with [`crate::Error::Resolution`] only when no upstream
/// could produce an address.
#[async_trait]
pub trait AddressSource: Send + Sync {
    /// Look up the current external IP address
    async fn current(&self) -> Result<IpAddr, crate::Error>;

    /// Name used in logs (e.g. "http")
    fn source_name(&self) -> &'static str;
}
