//! Database schema management and migrations.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_BOOKINGS_TABLE, CREATE_EMAIL_INDEX, CREATE_EXPIRES_INDEX, CREATE_ISSUED_CODES_TABLE,
    CREATE_METADATA_TABLE, CREATE_REFERENCE_COUNTERS_TABLE, CREATE_ROOM_DATES_INDEX,
    CREATE_ROOM_TYPES_TABLE, CREATE_STATUS_INDEX, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION,
    SELECT_SCHEMA_VERSION,
};

/// Initializes the database schema.
///
/// Creates all tables, indices, and metadata for a fresh database. Every
/// statement is idempotent, so two processes racing to initialize the same
/// file both succeed.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use roomhold::database::migrations::initialize_schema;
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;

    conn.execute(CREATE_ROOM_TYPES_TABLE, [])?;
    conn.execute(CREATE_BOOKINGS_TABLE, [])?;
    conn.execute(CREATE_ISSUED_CODES_TABLE, [])?;
    conn.execute(CREATE_REFERENCE_COUNTERS_TABLE, [])?;

    conn.execute(CREATE_ROOM_DATES_INDEX, [])?;
    conn.execute(CREATE_STATUS_INDEX, [])?;
    conn.execute(CREATE_EXPIRES_INDEX, [])?;
    conn.execute(CREATE_EMAIL_INDEX, [])?;

    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;

    Ok(())
}

/// Gets the current schema version from the database.
///
/// # Errors
///
/// Returns an error if the query fails for reasons other than a missing
/// metadata table or row (both of which mean version 0).
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => {
            // "no such table" surfaces as a generic error
            if let rusqlite::Error::SqliteFailure(ref sqlite_err, _) = e {
                if sqlite_err.code == rusqlite::ErrorCode::Unknown {
                    return Ok(0);
                }
            }
            Err(e.into())
        }
    }
}

/// Checks schema compatibility and initializes if needed.
///
/// A fresh database is initialized. Any other version than the current one
/// is rejected.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] for a mismatched version, or
/// a database error if the checks themselves fail.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        log::debug!("initializing schema version {CURRENT_SCHEMA_VERSION}");
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}
