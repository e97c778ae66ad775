//! Error types for the IP monitor
//!
//! This module defines all error types used throughout the crate, plus the
//! [`Outcome`] type that separates recoverable failures from fatal ones.

use thiserror::Error;

/// Result type alias for monitor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the IP monitor
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing topic, bad interval)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every address lookup service failed
    #[error("Address resolution failed: {0}")]
    Resolution(String),

    /// Invalid input (malformed test IP, missing `--ip`)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// History log or checkpoint file could not be read or written
    #[error("Log I/O error: {0}")]
    LogIo(String),

    /// Push notification could not be delivered
    #[error("Notification delivery failed: {0}")]
    NotificationDelivery(String),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Underlying I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an address resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a log I/O error
    pub fn log_io(msg: impl Into<String>) -> Self {
        Self::LogIo(msg.into())
    }

    /// Create a notification delivery error
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::NotificationDelivery(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Whether a run can continue after this error
    ///
    /// Log I/O and delivery failures are reported and then ignored; anything
    /// else ends the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::LogIo(_) | Self::NotificationDelivery(_))
    }
}

/// Result of a side-effecting step that may fail without ending the run
///
/// `Recoverable` failures are reported and replaced by a fallback value;
/// `Fatal` ones must reach the top-level boundary.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
    /// The step completed
    Success(T),
    /// The step failed but the run continues
    Recoverable(Error),
    /// The step failed and the run must stop
    Fatal(Error),
}

impl<T> Outcome<T> {
    /// Resolve into a `Result`, substituting `fallback` for recoverable failures
    ///
    /// Recoverable failures are logged at error level before being discarded.
    pub fn recover_with(self, fallback: T) -> Result<T> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Recoverable(err) => {
                tracing::error!("{}", err);
                Ok(fallback)
            }
            Outcome::Fatal(err) => Err(err),
        }
    }

    /// Whether the step completed
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// The success value, if any
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            _ => None,
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    /// Classify a plain result using [`Error::is_recoverable`]
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) if err.is_recoverable() => Outcome::Recoverable(err),
            Err(err) => Outcome::Fatal(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(Error::log_io("disk full").is_recoverable());
        assert!(Error::delivery("503").is_recoverable());
        assert!(!Error::resolution("all failed").is_recoverable());
        assert!(!Error::config("no topic").is_recoverable());
        assert!(!Error::validation("bad ip").is_recoverable());
    }

    #[test]
    fn test_recover_with_substitutes_fallback() {
        let outcome: Outcome<Option<String>> = Outcome::Recoverable(Error::log_io("unreadable"));
        assert_eq!(outcome.recover_with(None).unwrap(), None);

        let outcome = Outcome::Success(Some("1.2.3.4".to_string()));
        assert_eq!(
            outcome.recover_with(None).unwrap(),
            Some("1.2.3.4".to_string())
        );
    }

    #[test]
    fn test_fatal_is_never_swallowed() {
        let outcome: Outcome<()> = Outcome::Fatal(Error::resolution("all failed"));
        let err = outcome.recover_with(()).unwrap_err();
        assert!(matches!(err, Error::Resolution(_)));
    }

    #[test]
    fn test_from_result() {
        let outcome: Outcome<u8> = Err(Error::log_io("x")).into();
        assert!(matches!(outcome, Outcome::Recoverable(_)));

        let outcome: Outcome<u8> = Err(Error::http("x")).into();
        assert!(matches!(outcome, Outcome::Fatal(_)));

        let outcome: Outcome<u8> = Ok(7).into();
        assert!(outcome.is_success());
        assert_eq!(outcome.success(), Some(7));
    }
}
