//! Database connection management.

use rusqlite::{Connection, OpenFlags};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;

/// A database connection wrapper with configuration.
///
/// Each worker thread or process opens its own `Database` on the shared
/// file; SQLite's locking serializes writers across them.
///
/// # Examples
///
/// ```no_run
/// use roomhold::database::{Database, DatabaseConfig};
///
/// let config = DatabaseConfig::new("/tmp/roomhold.db");
/// let db = Database::open(config).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens a database connection with the given configuration.
    ///
    /// This function will:
    /// - Create the parent directory if `auto_create` is enabled
    /// - Open the database with appropriate flags
    /// - Set WAL mode for concurrent access
    /// - Configure busy timeout
    /// - Initialize or verify the database schema
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataDirectoryNotFound`] if the database is missing
    /// and auto-create is off, or a database error if opening, configuring
    /// or schema verification fails.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if !config.path.exists() {
            if config.auto_create {
                if let Some(parent) = config.path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
            } else {
                return Err(Error::DataDirectoryNotFound {
                    path: config
                        .path
                        .parent()
                        .map_or_else(|| config.path.clone(), std::path::Path::to_path_buf),
                });
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // busy_timeout first so the journal mode switch waits on other openers
        conn.busy_timeout(config.busy_timeout)?;
        if !config.read_only {
            // PRAGMA journal_mode returns a row
            let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        }
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;

        super::migrations::check_schema_compatibility(&conn)?;

        log::debug!("opened database {}", config.path.display());
        Ok(Self { conn, config })
    }

    /// Opens a second connection to the same database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can no longer be opened.
    pub fn reopen(&self) -> Result<Self> {
        Self::open(self.config.clone())
    }

    /// Returns the configuration this connection was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns a mutable reference to the underlying `SQLite` connection.
    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
