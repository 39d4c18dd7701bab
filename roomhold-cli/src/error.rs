//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use roomhold::{Error as LibError, ErrorKind};
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Timeout waiting for database lock.
    Timeout,

    /// Data directory not found (and auto-init disabled).
    NoDataDirectory,

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Refused state transition
    /// - 2: Timeout waiting for database lock
    /// - 3: No data directory found
    /// - 4: Invalid arguments or validation error
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    /// - 8: Not found
    /// - 9: No availability
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Library(lib_err) => match lib_err {
                LibError::Io(_) => 5,
                LibError::Configuration(_) | LibError::InvalidConfig { .. } => 7,
                _ => match lib_err.kind() {
                    ErrorKind::State => 1,
                    ErrorKind::Validation => 4,
                    ErrorKind::NotFound => 8,
                    ErrorKind::Conflict => 9,
                    ErrorKind::System => 6,
                },
            },
            CliError::Timeout => 2,
            CliError::NoDataDirectory => 3,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e} [{}]", e.reason_code()),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Timeout => write!(f, "Timeout waiting for database lock"),
            CliError::NoDataDirectory => {
                write!(
                    f,
                    "Data directory not found (use --data-dir or enable auto-init)"
                )
            }
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::LockTimeout { .. } => CliError::Timeout,
            LibError::DataDirectoryNotFound { .. } => CliError::NoDataDirectory,
            e => CliError::Library(e),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(e.into())
    }
}
