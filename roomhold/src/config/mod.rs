//! Configuration system for roomhold.
//!
//! This module provides hierarchical configuration with support for:
//! - YAML configuration files (user config and project `roomhold.yaml`)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`ROOMHOLD_*`)
//! 3. Project config (`roomhold.yaml`)
//! 4. User config (`~/.roomhold/config.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! Loading from a specific directory:
//!
//! ```no_run
//! use roomhold::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/srv/hotel"))
//!     .build()
//!     .unwrap();
//! println!("holds last {:?}", config.engine_config().hold_duration);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{
    Config, EngineConfig, DEFAULT_CODE_ATTEMPTS, DEFAULT_HOLD_DURATION_MINUTES,
    DEFAULT_MAXIMUM_LOCK_WAIT_SECONDS, DEFAULT_REFERENCE_PREFIX, DEFAULT_RESERVE_ATTEMPTS,
    DEFAULT_SWEEP_INTERVAL_SECONDS,
};
pub use validator::ConfigValidator;
