//! Logging infrastructure for the roomhold library.
//!
//! Library code logs through the [`log`] facade. This module provides the
//! stderr backend used by the CLI, with three coarse verbosity levels.

use std::env;
use std::fmt;

use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// Environment variable consulted by [`init_logger`].
pub const LOG_MODE_ENV: &str = "ROOMHOLD_LOG_MODE";

/// Logging level for controlling output verbosity.
///
/// Log levels are ordered from least verbose (Quiet) to most verbose (Verbose).
///
/// # Examples
///
/// ```
/// use roomhold::LogLevel;
///
/// assert!(LogLevel::Quiet < LogLevel::Normal);
/// assert!(LogLevel::Normal < LogLevel::Verbose);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Suppress all output.
    Quiet,
    /// Errors and warnings.
    Normal,
    /// Errors, warnings, info, and debug messages.
    Verbose,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Normal => write!(f, "normal"),
            Self::Verbose => write!(f, "verbose"),
        }
    }
}

impl LogLevel {
    /// Parses a log level from a string.
    ///
    /// Recognizes: "quiet", "normal", "verbose" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomhold::LogLevel;
    ///
    /// assert_eq!(LogLevel::parse("VERBOSE").unwrap(), LogLevel::Verbose);
    /// assert!(LogLevel::parse("chatty").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            _ => Err(format!("invalid log level: {s}")),
        }
    }

    /// Returns the `log` crate filter matching this level.
    #[must_use]
    pub const fn filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Off,
            Self::Normal => LevelFilter::Warn,
            Self::Verbose => LevelFilter::Debug,
        }
    }
}

/// A stderr logger backing the `log` facade.
///
/// # Examples
///
/// ```
/// use roomhold::{Logger, LogLevel};
///
/// let logger = Logger::new(LogLevel::Normal);
/// assert_eq!(logger.level(), LogLevel::Normal);
/// ```
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
}

impl Logger {
    /// Creates a new logger with the specified log level.
    #[must_use]
    pub const fn new(level: LogLevel) -> Self {
        Self { level }
    }

    /// Returns the current log level.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }

    /// Installs this logger as the global `log` backend.
    ///
    /// # Errors
    ///
    /// Returns an error if a global logger is already installed.
    pub fn install(self) -> Result<(), SetLoggerError> {
        let filter = self.level.filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LogLevel::Normal)
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level.filter()
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Builds a logger from CLI flags and the environment.
///
/// The priority order is:
/// 1. CLI flags (verbose/quiet)
/// 2. `ROOMHOLD_LOG_MODE` environment variable
/// 3. Default (Normal)
///
/// If both `verbose` and `quiet` are true, `verbose` takes precedence.
///
/// # Examples
///
/// ```
/// use roomhold::{init_logger, LogLevel};
///
/// let logger = init_logger(false, true);
/// assert_eq!(logger.level(), LogLevel::Quiet);
/// ```
#[must_use]
pub fn init_logger(verbose: bool, quiet: bool) -> Logger {
    if verbose {
        return Logger::new(LogLevel::Verbose);
    }
    if quiet {
        return Logger::new(LogLevel::Quiet);
    }

    if let Ok(env_value) = env::var(LOG_MODE_ENV) {
        if let Ok(level) = LogLevel::parse(&env_value) {
            return Logger::new(level);
        }
    }

    Logger::new(LogLevel::Normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::{Level, Log};
    use serial_test::serial;

    struct EnvGuard(Option<String>);

    impl EnvGuard {
        fn set(value: Option<&str>) -> Self {
            let saved = env::var(LOG_MODE_ENV).ok();
            match value {
                Some(v) => env::set_var(LOG_MODE_ENV, v),
                None => env::remove_var(LOG_MODE_ENV),
            }
            Self(saved)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.0 {
                Some(v) => env::set_var(LOG_MODE_ENV, v),
                None => env::remove_var(LOG_MODE_ENV),
            }
        }
    }

    #[test]
    fn test_log_level_display_and_parse() {
        for level in [LogLevel::Quiet, LogLevel::Normal, LogLevel::Verbose] {
            assert_eq!(LogLevel::parse(&level.to_string()).unwrap(), level);
        }
        assert_eq!(LogLevel::parse("Normal").unwrap(), LogLevel::Normal);
        assert!(LogLevel::parse("").is_err());
    }

    #[test]
    fn test_level_filters() {
        assert_eq!(LogLevel::Quiet.filter(), LevelFilter::Off);
        assert_eq!(LogLevel::Normal.filter(), LevelFilter::Warn);
        assert_eq!(LogLevel::Verbose.filter(), LevelFilter::Debug);
    }

    #[test]
    fn test_enabled_respects_level() {
        let normal = Logger::new(LogLevel::Normal);
        let meta = |level| Metadata::builder().level(level).build();
        assert!(normal.enabled(&meta(Level::Error)));
        assert!(normal.enabled(&meta(Level::Warn)));
        assert!(!normal.enabled(&meta(Level::Info)));

        let quiet = Logger::new(LogLevel::Quiet);
        assert!(!quiet.enabled(&meta(Level::Error)));

        let verbose = Logger::new(LogLevel::Verbose);
        assert!(verbose.enabled(&meta(Level::Debug)));
        assert!(!verbose.enabled(&meta(Level::Trace)));
    }

    #[test]
    fn test_logger_default() {
        assert_eq!(Logger::default().level(), LogLevel::Normal);
    }

    #[test]
    #[serial]
    fn test_init_logger_defaults() {
        let _guard = EnvGuard::set(None);
        assert_eq!(init_logger(false, false).level(), LogLevel::Normal);
    }

    #[test]
    #[serial]
    fn test_init_logger_flags() {
        let _guard = EnvGuard::set(Some("quiet"));
        assert_eq!(init_logger(true, false).level(), LogLevel::Verbose);
        assert_eq!(init_logger(false, true).level(), LogLevel::Quiet);
        assert_eq!(init_logger(true, true).level(), LogLevel::Verbose);
    }

    #[test]
    #[serial]
    fn test_init_logger_from_env() {
        let _guard = EnvGuard::set(Some("verbose"));
        assert_eq!(init_logger(false, false).level(), LogLevel::Verbose);

        env::set_var(LOG_MODE_ENV, "invalid");
        assert_eq!(init_logger(false, false).level(), LogLevel::Normal);
    }
}
