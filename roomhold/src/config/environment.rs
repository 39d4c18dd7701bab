//! Environment variable handling for configuration overrides.
//!
//! Every `ROOMHOLD_*` variable overrides the matching file setting.

use crate::config::schema::Config;
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Overrides `hold_duration_minutes`.
pub const HOLD_DURATION_ENV: &str = "ROOMHOLD_HOLD_DURATION_MINUTES";
/// Overrides `sweep_interval_seconds`.
pub const SWEEP_INTERVAL_ENV: &str = "ROOMHOLD_SWEEP_INTERVAL_SECONDS";
/// Overrides `reference_prefix`.
pub const REFERENCE_PREFIX_ENV: &str = "ROOMHOLD_REFERENCE_PREFIX";
/// Overrides `code_attempts`.
pub const CODE_ATTEMPTS_ENV: &str = "ROOMHOLD_CODE_ATTEMPTS";
/// Overrides `reserve_attempts`.
pub const RESERVE_ATTEMPTS_ENV: &str = "ROOMHOLD_RESERVE_ATTEMPTS";
/// Overrides `maximum_lock_wait_seconds`.
pub const LOCK_WAIT_ENV: &str = "ROOMHOLD_MAXIMUM_LOCK_WAIT_SECONDS";
/// Overrides `disable_autoinit`.
pub const DISABLE_AUTOINIT_ENV: &str = "ROOMHOLD_DISABLE_AUTOINIT";

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use roomhold::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds a value of the wrong type
    /// (e.g., non-numeric minutes, invalid boolean).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var(HOLD_DURATION_ENV) {
            config.hold_duration_minutes = Some(Self::parse_number(HOLD_DURATION_ENV, &val)?);
        }

        if let Ok(val) = env::var(SWEEP_INTERVAL_ENV) {
            config.sweep_interval_seconds = Some(Self::parse_number(SWEEP_INTERVAL_ENV, &val)?);
        }

        if let Ok(prefix) = env::var(REFERENCE_PREFIX_ENV) {
            config.reference_prefix = Some(prefix.trim().to_string());
        }

        if let Ok(val) = env::var(CODE_ATTEMPTS_ENV) {
            config.code_attempts = Some(Self::parse_number(CODE_ATTEMPTS_ENV, &val)?);
        }

        if let Ok(val) = env::var(RESERVE_ATTEMPTS_ENV) {
            config.reserve_attempts = Some(Self::parse_number(RESERVE_ATTEMPTS_ENV, &val)?);
        }

        if let Ok(val) = env::var(LOCK_WAIT_ENV) {
            config.maximum_lock_wait_seconds = Some(Self::parse_number(LOCK_WAIT_ENV, &val)?);
        }

        if let Ok(val) = env::var(DISABLE_AUTOINIT_ENV) {
            config.disable_autoinit = Some(Self::parse_bool(DISABLE_AUTOINIT_ENV, &val)?);
        }

        Ok(())
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::InvalidConfig {
            field: field.into(),
            message: format!("must be a non-negative integer, got '{s}'"),
        })
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::InvalidConfig {
                field: field.into(),
                message: format!(
                    "invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
