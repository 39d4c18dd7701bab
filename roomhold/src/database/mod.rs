//! Database layer for persistent storage of room types and bookings.
//!
//! This module provides a SQLite-based storage layer: connection
//! management, schema versioning, serialized write transactions, and the
//! row-level reads and guarded updates the booking engine is built on.
//!
//! # Examples
//!
//! ```no_run
//! use roomhold::database::{Database, DatabaseConfig};
//! use roomhold::room::{RoomType, RoomTypeId};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/roomhold.db")).unwrap();
//! db.upsert_room_type(&RoomType::new(RoomTypeId::new(1), "Double", 4, 2, 12_000))
//!     .unwrap();
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
pub mod schema;
mod transaction;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV,
};
pub use connection::Database;

pub(crate) use operations::NewBooking;
pub(crate) use transaction::{is_busy, is_constraint_violation};

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
