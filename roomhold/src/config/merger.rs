//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::Config;

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use roomhold::config::{Config, ConfigMerger};
///
/// let low = Config { code_attempts: Some(3), ..Default::default() };
/// let high = Config { code_attempts: Some(9), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.code_attempts, Some(9));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target; every field set in `source` wins.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.hold_duration_minutes.is_some() {
            target.hold_duration_minutes = source.hold_duration_minutes;
        }

        if source.sweep_interval_seconds.is_some() {
            target.sweep_interval_seconds = source.sweep_interval_seconds;
        }

        if source.reference_prefix.is_some() {
            target.reference_prefix.clone_from(&source.reference_prefix);
        }

        if source.code_attempts.is_some() {
            target.code_attempts = source.code_attempts;
        }

        if source.reserve_attempts.is_some() {
            target.reserve_attempts = source.reserve_attempts;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }
    }
}
