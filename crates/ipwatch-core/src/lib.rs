// # ipwatch-core
//
// Core library for the external IP change notifier.
//
// ## Architecture Overview
//
// - **AddressSource**: Trait for discovering the external IP address
// - **Notifier**: Trait for delivering push notifications
// - **HistoryLog**: Append-only record of observed addresses
// - **HealthTracker**: Persisted timestamp of the last liveness notification
// - **Monitor**: Runs one fetch → compare → log → notify pass
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from transports
// 2. **Explicit Configuration**: One `MonitorConfig` built at start, passed down
// 3. **Recoverable vs Fatal**: Log and delivery failures never abort a run
// 4. **Library-First**: The binary only wires components together

pub mod config;
pub mod error;
pub mod mode;
pub mod monitor;
pub mod notification;
pub mod state;
pub mod traits;

// Re-export core types for convenience
pub use config::{HealthConfig, MonitorConfig, NotifyAuth, NotifyConfig, PathsConfig};
pub use error::{Error, Outcome, Result};
pub use mode::{RunMode, validate_ip};
pub use monitor::{Monitor, RunReport};
pub use notification::{Notification, Priority};
pub use state::{HealthTracker, HistoryLog, Observation, ObservationStatus};
pub use traits::{AddressSource, Notifier};
