//! Database configuration and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable naming the data directory.
pub const DATA_DIR_ENV: &str = "ROOMHOLD_DATA_DIR";

/// File name of the database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "roomhold.db";

/// Configuration for database connections.
///
/// # Examples
///
/// ```
/// use roomhold::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/roomhold.db")
///     .with_busy_timeout(Duration::from_secs(10));
/// assert!(config.auto_create);
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Whether to create the database (and its directory) if missing.
    pub auto_create: bool,
    /// Whether to open the database in read-only mode.
    pub read_only: bool,
}

impl DatabaseConfig {
    /// Creates a configuration with a 5 second busy timeout, auto-create on.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout duration.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Disables creation of a missing database.
    #[must_use]
    pub const fn without_auto_create(mut self) -> Self {
        self.auto_create = false;
        self
    }

    /// Opens the database read-only. Implies no auto-create.
    #[must_use]
    pub const fn read_only(mut self) -> Self {
        self.read_only = true;
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory, `~/.roomhold`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    home::home_dir()
        .map(|home| home.join(".roomhold"))
        .ok_or_else(|| Error::InvalidConfig {
            field: "data_dir".into(),
            message: "cannot determine home directory".into(),
        })
}

/// Resolves the data directory from `ROOMHOLD_DATA_DIR` or the default.
///
/// # Errors
///
/// Returns an error if the variable is unset and the home directory cannot
/// be determined.
pub fn resolve_data_dir() -> Result<PathBuf> {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => default_data_dir(),
    }
}

/// Resolves the database path.
///
/// The resolution order is:
/// 1. `$ROOMHOLD_DATA_DIR/roomhold.db`
/// 2. `~/.roomhold/roomhold.db`
///
/// # Errors
///
/// Returns an error if neither location can be determined.
pub fn resolve_database_path() -> Result<PathBuf> {
    Ok(resolve_data_dir()?.join(DATABASE_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_new() {
        let config = DatabaseConfig::new("/tmp/test.db");
        assert_eq!(config.path, PathBuf::from("/tmp/test.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(5000));
        assert!(config.auto_create);
        assert!(!config.read_only);
    }

    #[test]
    fn test_config_modifiers() {
        let config = DatabaseConfig::new("/tmp/test.db")
            .with_busy_timeout(Duration::from_millis(250))
            .without_auto_create();
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
        assert!(!config.auto_create);

        let config = DatabaseConfig::new("/tmp/test.db").read_only();
        assert!(config.read_only);
        assert!(!config.auto_create);
    }

    #[test]
    #[serial]
    fn test_resolve_database_path() {
        let saved = std::env::var_os(DATA_DIR_ENV);

        std::env::set_var(DATA_DIR_ENV, "/custom/data");
        assert_eq!(
            resolve_database_path().unwrap(),
            PathBuf::from("/custom/data/roomhold.db")
        );

        std::env::remove_var(DATA_DIR_ENV);
        if let Ok(path) = resolve_database_path() {
            assert!(path.ends_with(".roomhold/roomhold.db"));
        }

        if let Some(value) = saved {
            std::env::set_var(DATA_DIR_ENV, value);
        }
    }
}
