//! Serialized write transactions.

use rusqlite::{ErrorCode, Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::connection::Database;

impl Database {
    /// Runs `work` inside a `BEGIN IMMEDIATE` transaction and commits it.
    ///
    /// `BEGIN IMMEDIATE` takes the database write lock up front, so every
    /// read `work` performs is serialized against every other writer until
    /// commit. If the lock cannot be had within the busy timeout the whole
    /// attempt is rolled back and retried, up to `attempts` times; nothing
    /// was written, so `work` simply runs again. An error from `work`
    /// rolls the transaction back and is returned as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] once every attempt met a busy
    /// database, or whatever `work` returned.
    pub fn with_immediate_transaction<T, F>(&mut self, attempts: u32, mut work: F) -> Result<T>
    where
        F: FnMut(&Transaction<'_>) -> Result<T>,
    {
        let attempts = attempts.max(1);
        for attempt in 1..=attempts {
            match self.try_immediate(&mut work) {
                Err(err) if is_busy(&err) => {
                    log::warn!("database busy (attempt {attempt} of {attempts})");
                }
                other => return other,
            }
        }

        let seconds = self.config().busy_timeout.as_secs();
        log::error!("gave up on the database write lock after {attempts} attempt(s)");
        Err(Error::LockTimeout { seconds, attempts })
    }

    fn try_immediate<T, F>(&mut self, work: &mut F) -> Result<T>
    where
        F: FnMut(&Transaction<'_>) -> Result<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = work(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// Returns true if the error means another connection holds the lock.
pub(crate) fn is_busy(err: &Error) -> bool {
    matches!(
        err,
        Error::Database(rusqlite::Error::SqliteFailure(e, _))
            if matches!(e.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

/// Returns true if the error is a constraint violation.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}
