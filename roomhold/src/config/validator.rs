//! Configuration validation.
//!
//! Runs on the merged configuration, so a value is checked once no matter
//! which source supplied it.

use std::ops::RangeInclusive;

use crate::config::schema::Config;
use crate::error::{Error, Result};

/// Allowed hold lifetimes, in minutes (one minute to one week).
pub const HOLD_DURATION_RANGE: RangeInclusive<u32> = 1..=10_080;

/// Allowed sweeper intervals, in seconds.
pub const SWEEP_INTERVAL_RANGE: RangeInclusive<u64> = 10..=3600;

/// Allowed verification code draw budgets.
pub const CODE_ATTEMPTS_RANGE: RangeInclusive<u32> = 1..=20;

/// Allowed reservation retry budgets.
pub const RESERVE_ATTEMPTS_RANGE: RangeInclusive<u32> = 1..=10;

/// Longest allowed reference prefix.
pub const MAX_PREFIX_LEN: usize = 8;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use roomhold::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad = Config { sweep_interval_seconds: Some(1), ..Default::default() };
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] naming the first invalid field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(minutes) = config.hold_duration_minutes {
            Self::validate_range("hold_duration_minutes", minutes, &HOLD_DURATION_RANGE)?;
        }

        if let Some(seconds) = config.sweep_interval_seconds {
            Self::validate_range("sweep_interval_seconds", seconds, &SWEEP_INTERVAL_RANGE)?;
        }

        if let Some(ref prefix) = config.reference_prefix {
            Self::validate_prefix(prefix)?;
        }

        if let Some(attempts) = config.code_attempts {
            Self::validate_range("code_attempts", attempts, &CODE_ATTEMPTS_RANGE)?;
        }

        if let Some(attempts) = config.reserve_attempts {
            Self::validate_range("reserve_attempts", attempts, &RESERVE_ATTEMPTS_RANGE)?;
        }

        if config.maximum_lock_wait_seconds == Some(0) {
            return Err(Error::InvalidConfig {
                field: "maximum_lock_wait_seconds".into(),
                message: "timeout must be greater than 0".into(),
            });
        }

        Ok(())
    }

    fn validate_range<T>(field: &str, value: T, range: &RangeInclusive<T>) -> Result<()>
    where
        T: PartialOrd + std::fmt::Display,
    {
        if range.contains(&value) {
            return Ok(());
        }
        Err(Error::InvalidConfig {
            field: field.into(),
            message: format!(
                "{value} is outside the allowed range {}..={}",
                range.start(),
                range.end()
            ),
        })
    }

    /// Reference prefixes are 1 to 8 uppercase ASCII letters or digits.
    fn validate_prefix(prefix: &str) -> Result<()> {
        let valid = !prefix.is_empty()
            && prefix.len() <= MAX_PREFIX_LEN
            && prefix
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if valid {
            return Ok(());
        }
        Err(Error::InvalidConfig {
            field: "reference_prefix".into(),
            message: format!(
                "'{prefix}' must be 1 to {MAX_PREFIX_LEN} uppercase letters or digits"
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: &Error) -> &str {
        match err {
            Error::InvalidConfig { field, .. } => field,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validate_empty_config() {
        assert!(ConfigValidator::validate(&Config::default()).is_ok());
    }

    #[test]
    fn test_hold_duration_bounds() {
        for ok in [1, 360, 10_080] {
            let config = Config {
                hold_duration_minutes: Some(ok),
                ..Default::default()
            };
            assert!(ConfigValidator::validate(&config).is_ok(), "{ok}");
        }
        for bad in [0, 10_081] {
            let config = Config {
                hold_duration_minutes: Some(bad),
                ..Default::default()
            };
            let err = ConfigValidator::validate(&config).unwrap_err();
            assert_eq!(field_of(&err), "hold_duration_minutes");
        }
    }

    #[test]
    fn test_sweep_interval_bounds() {
        let config = Config {
            sweep_interval_seconds: Some(9),
            ..Default::default()
        };
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(&err), "sweep_interval_seconds");

        let config = Config {
            sweep_interval_seconds: Some(3600),
            ..Default::default()
        };
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_prefix_rules() {
        for ok in ["FW", "A", "ABCD1234"] {
            assert!(ConfigValidator::validate_prefix(ok).is_ok(), "{ok}");
        }
        for bad in ["", "fw", "F-W", "ABCDEFGHI", "FÜ"] {
            assert!(ConfigValidator::validate_prefix(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_attempt_budgets() {
        let config = Config {
            code_attempts: Some(0),
            ..Default::default()
        };
        assert_eq!(field_of(&ConfigValidator::validate(&config).unwrap_err()), "code_attempts");

        let config = Config {
            reserve_attempts: Some(11),
            ..Default::default()
        };
        assert_eq!(
            field_of(&ConfigValidator::validate(&config).unwrap_err()),
            "reserve_attempts"
        );
    }

    #[test]
    fn test_zero_lock_wait_rejected() {
        let config = Config {
            maximum_lock_wait_seconds: Some(0),
            ..Default::default()
        };
        let err = ConfigValidator::validate(&config).unwrap_err();
        assert_eq!(field_of(&err), "maximum_lock_wait_seconds");
        assert_eq!(err.reason_code(), "CONFIGURATION_ERROR");
    }
}
