// # Persisted State
//
// The two pieces of state that survive between runs: the append-only
// history log of observed addresses and the health checkpoint.

pub mod health;
pub mod history;

pub use health::HealthTracker;
pub use history::{HistoryLog, Observation, ObservationStatus};
