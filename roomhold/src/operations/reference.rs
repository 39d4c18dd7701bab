//! Booking reference generation.

use rusqlite::Connection;

use crate::booking::BookingReference;
use crate::database::schema::NEXT_REFERENCE_SEQUENCE;
use crate::error::Result;

/// Issues `PREFIX-YEAR-SEQ` references from an atomic per-year counter.
///
/// The counter row is advanced with a single upsert, so two writers can
/// never read the same sequence. Called inside the reservation transaction,
/// the increment commits or rolls back together with the booking; a
/// rolled-back increment leaves a gap, never a duplicate.
#[derive(Debug, Clone)]
pub struct ReferenceGenerator {
    prefix: String,
}

impl ReferenceGenerator {
    /// Creates a generator for `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into().to_ascii_uppercase(),
        }
    }

    /// The prefix references start with.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the next reference for `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be advanced.
    pub fn generate(&self, conn: &Connection, year: i32) -> Result<BookingReference> {
        let mut stmt = conn.prepare_cached(NEXT_REFERENCE_SEQUENCE)?;
        let sequence: u64 = stmt.query_row([year], |row| row.get::<_, i64>(0))?.unsigned_abs();
        Ok(BookingReference::new(&self.prefix, year, sequence))
    }
}
