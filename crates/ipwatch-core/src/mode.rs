//! Run modes and test address validation

use crate::{Error, Result};
use std::fmt;

/// What a single invocation does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Resolve the external address, log it, notify on change and health
    Normal,
    /// Use a supplied address and the separate test log; never sends health
    /// or error notifications
    Test {
        /// Validated dotted-quad address
        address: String,
    },
    /// Only send the health notification if it is due
    HealthCheckOnly,
}

impl RunMode {
    /// Build the run mode from command-line flags
    ///
    /// `health_check_only` wins over everything else. In test mode the
    /// address is required and must be a valid dotted quad. An address
    /// without `test` is ignored.
    pub fn from_flags(test: bool, ip: Option<&str>, health_check_only: bool) -> Result<Self> {
        if health_check_only {
            return Ok(RunMode::HealthCheckOnly);
        }

        if !test {
            return Ok(RunMode::Normal);
        }

        let ip = ip.ok_or_else(|| Error::validation("--ip parameter is required in test mode"))?;

        if !validate_ip(ip) {
            return Err(Error::validation(format!("Invalid IP address format: {}", ip)));
        }

        Ok(RunMode::Test {
            address: ip.to_string(),
        })
    }

    pub fn is_test(&self) -> bool {
        matches!(self, RunMode::Test { .. })
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Normal => f.write_str("normal"),
            RunMode::Test { .. } => f.write_str("test"),
            RunMode::HealthCheckOnly => f.write_str("health-check-only"),
        }
    }
}

/// Check that `ip` is four dot-separated decimal octets in 0..=255
///
/// Leading zeros are accepted ("010" is 10); signs, whitespace and empty
/// octets are not.
pub fn validate_ip(ip: &str) -> bool {
    let parts: Vec<&str> = ip.split('.').collect();
    if parts.len() != 4 {
        return false;
    }

    parts.iter().all(|part| {
        !part.is_empty()
            && part.bytes().all(|b| b.is_ascii_digit())
            && part.parse::<u16>().is_ok_and(|n| n <= 255)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ip_accepts_every_octet_value() {
        for n in 0..=255u16 {
            let ip = format!("{n}.{n}.{n}.{n}");
            assert!(validate_ip(&ip), "{} should be valid", ip);
        }
        assert!(validate_ip("192.168.1.1"));
        assert!(validate_ip("010.0.0.1"));
    }

    #[test]
    fn test_validate_ip_rejects_malformed() {
        for ip in [
            "",
            "1.2.3",
            "1.2.3.4.5",
            "256.1.1.1",
            "1.2.3.999",
            "1.2.3.-1",
            "a.b.c.d",
            "1.2.3.",
            "1..3.4",
            " 1.2.3.4",
            "1.2.3.+4",
            "1.2.3.4 ",
            "99999.1.1.1",
            "::1",
        ] {
            assert!(!validate_ip(ip), "{:?} should be rejected", ip);
        }
    }

    #[test]
    fn test_health_check_only_wins() {
        let mode = RunMode::from_flags(true, None, true).unwrap();
        assert_eq!(mode, RunMode::HealthCheckOnly);
    }

    #[test]
    fn test_test_mode_requires_ip() {
        let err = RunMode::from_flags(true, None, false).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = RunMode::from_flags(true, Some("300.1.1.1"), false).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_modes_from_flags() {
        assert_eq!(
            RunMode::from_flags(true, Some("192.168.1.1"), false).unwrap(),
            RunMode::Test {
                address: "192.168.1.1".into()
            }
        );
        // --ip alone does not switch modes
        assert_eq!(
            RunMode::from_flags(false, Some("192.168.1.1"), false).unwrap(),
            RunMode::Normal
        );
        assert_eq!(RunMode::Normal.to_string(), "normal");
    }
}
