//! Core traits for the IP monitor
//!
//! - [`AddressSource`]: Discover the external IP address
//! - [`Notifier`]: Deliver push notifications

pub mod address_source;
pub mod notifier;

pub use address_source::AddressSource;
pub use notifier::Notifier;
