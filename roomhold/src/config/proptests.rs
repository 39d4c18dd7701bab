//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::Config;
use super::validator::{ConfigValidator, HOLD_DURATION_RANGE, SWEEP_INTERVAL_RANGE};
use proptest::prelude::*;

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(0u32..20_000),
        prop::option::of(0u64..5_000),
        prop::option::of("[A-Z0-9]{1,8}"),
        prop::option::of(0u32..30),
        prop::option::of(0u32..30),
        prop::option::of(0u64..60),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(hold, sweep, prefix, code, reserve, lock_wait, autoinit)| Config {
                hold_duration_minutes: hold,
                sweep_interval_seconds: sweep,
                reference_prefix: prefix,
                code_attempts: code,
                reserve_attempts: reserve,
                maximum_lock_wait_seconds: lock_wait,
                disable_autoinit: autoinit,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    // Every field set in the higher source wins; unset fields fall through
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(result.hold_duration_minutes, high.hold_duration_minutes.or(low.hold_duration_minutes));
        prop_assert_eq!(result.sweep_interval_seconds, high.sweep_interval_seconds.or(low.sweep_interval_seconds));
        prop_assert_eq!(result.reference_prefix.clone(), high.reference_prefix.clone().or(low.reference_prefix.clone()));
        prop_assert_eq!(result.code_attempts, high.code_attempts.or(low.code_attempts));
        prop_assert_eq!(result.reserve_attempts, high.reserve_attempts.or(low.reserve_attempts));
        prop_assert_eq!(result.maximum_lock_wait_seconds, high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds));
        prop_assert_eq!(result.disable_autoinit, high.disable_autoinit.or(low.disable_autoinit));
    }

    // Merging a config into itself changes nothing
    #[test]
    fn config_merge_idempotent(config in config_strategy()) {
        let mut result = config.clone();
        ConfigMerger::merge_into(&mut result, &config);
        prop_assert_eq!(result, config);
    }

    // Validation accepts exactly the documented hold and sweep ranges
    #[test]
    fn validation_matches_ranges(hold in 0u32..20_000, sweep in 0u64..5_000) {
        let config = Config {
            hold_duration_minutes: Some(hold),
            sweep_interval_seconds: Some(sweep),
            ..Default::default()
        };
        let expected = HOLD_DURATION_RANGE.contains(&hold) && SWEEP_INTERVAL_RANGE.contains(&sweep);
        prop_assert_eq!(ConfigValidator::validate(&config).is_ok(), expected);
    }

    // Resolved engine settings always reflect the configured hold
    #[test]
    fn engine_config_uses_configured_hold(hold in HOLD_DURATION_RANGE) {
        let config = Config {
            hold_duration_minutes: Some(hold),
            ..Default::default()
        };
        prop_assert_eq!(
            config.engine_config().hold_duration,
            chrono::Duration::minutes(i64::from(hold))
        );
    }
}
