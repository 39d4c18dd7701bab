//! Configuration schema definitions.
//!
//! [`Config`] is the file and environment shape: every field optional so
//! sources can be layered. [`EngineConfig`] is the resolved form the
//! engine runs with.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default hold lifetime: six hours.
pub const DEFAULT_HOLD_DURATION_MINUTES: u32 = 360;

/// Default pause between sweeper passes.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 120;

/// Default booking reference prefix.
pub const DEFAULT_REFERENCE_PREFIX: &str = "FW";

/// Default number of verification codes drawn before giving up.
pub const DEFAULT_CODE_ATTEMPTS: u32 = 5;

/// Default number of times a busy reservation transaction is retried.
pub const DEFAULT_RESERVE_ATTEMPTS: u32 = 3;

/// Default SQLite busy timeout.
pub const DEFAULT_MAXIMUM_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use roomhold::config::Config;
///
/// let config = Config {
///     hold_duration_minutes: Some(90),
///     reference_prefix: Some("GH".to_string()),
///     ..Default::default()
/// };
/// let engine = config.engine_config();
/// assert_eq!(engine.hold_duration, chrono::Duration::minutes(90));
/// assert_eq!(engine.reference_prefix, "GH");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Minutes an unconfirmed hold keeps its unit.
    pub hold_duration_minutes: Option<u32>,

    /// Seconds between expiry sweeper passes.
    pub sweep_interval_seconds: Option<u64>,

    /// Prefix of generated booking references.
    pub reference_prefix: Option<String>,

    /// Verification codes drawn per booking before `LOW_ENTROPY`.
    pub code_attempts: Option<u32>,

    /// Attempts at the reservation transaction while the database is busy.
    pub reserve_attempts: Option<u32>,

    /// SQLite busy timeout in seconds.
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Refuse to create a missing database.
    pub disable_autoinit: Option<bool>,
}

impl Config {
    /// Resolves the engine settings, filling unset fields with defaults.
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        let defaults = EngineConfig::default();
        EngineConfig {
            hold_duration: self
                .hold_duration_minutes
                .map_or(defaults.hold_duration, |m| chrono::Duration::minutes(i64::from(m))),
            sweep_interval: self
                .sweep_interval_seconds
                .map_or(defaults.sweep_interval, Duration::from_secs),
            reference_prefix: self
                .reference_prefix
                .clone()
                .unwrap_or(defaults.reference_prefix),
            code_attempts: self.code_attempts.unwrap_or(defaults.code_attempts),
            reserve_attempts: self.reserve_attempts.unwrap_or(defaults.reserve_attempts),
        }
    }

    /// The busy timeout to open databases with.
    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_MAXIMUM_LOCK_WAIT_SECONDS),
        )
    }
}

/// Settings the booking engine runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How long a new hold stays confirmable.
    pub hold_duration: chrono::Duration,
    /// Pause between sweeper passes.
    pub sweep_interval: Duration,
    /// Prefix of generated booking references.
    pub reference_prefix: String,
    /// Verification codes drawn per booking before giving up.
    pub code_attempts: u32,
    /// Attempts at the reservation transaction while the database is busy.
    pub reserve_attempts: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hold_duration: chrono::Duration::minutes(i64::from(DEFAULT_HOLD_DURATION_MINUTES)),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECONDS),
            reference_prefix: DEFAULT_REFERENCE_PREFIX.to_string(),
            code_attempts: DEFAULT_CODE_ATTEMPTS,
            reserve_attempts: DEFAULT_RESERVE_ATTEMPTS,
        }
    }
}
