//! Verification code issuing and lookup.
//!
//! Codes are 8 uppercase hexadecimal characters drawn from 4 bytes of a
//! cryptographically secure source. Every code ever issued is recorded in
//! `issued_codes` and never reissued, so a retired code keeps resolving to
//! its booking.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use rusqlite::{params, Connection};

use crate::booking::{normalize_code, Booking, BookingId, BookingStatus, VERIFICATION_CODE_LEN};
use crate::database::{is_constraint_violation, Database};
use crate::error::{Error, NotFoundReason, Result, TransitionRefusal};

const RESERVE_CODE: &str = "INSERT INTO issued_codes (code, booking_id) VALUES (?, NULL)";
const BIND_CODE: &str = "UPDATE issued_codes SET booking_id = ? WHERE code = ?";

/// A source of random bytes for verification codes.
pub trait EntropySource: Send {
    /// Fills `dest` with random bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Randomness`] if the source fails.
    fn fill(&mut self, dest: &mut [u8]) -> Result<()>;
}

/// The operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl EntropySource for OsEntropy {
    fn fill(&mut self, dest: &mut [u8]) -> Result<()> {
        OsRng.try_fill_bytes(dest).map_err(|e| {
            log::error!("random source failure: {e}");
            Error::Randomness {
                details: e.to_string(),
            }
        })
    }
}

/// Issues unique verification codes and resolves them back to bookings.
pub struct VerificationCodeIssuer {
    entropy: Box<dyn EntropySource>,
    attempts: u32,
}

impl fmt::Debug for VerificationCodeIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VerificationCodeIssuer")
            .field("attempts", &self.attempts)
            .finish_non_exhaustive()
    }
}

impl VerificationCodeIssuer {
    /// Creates an issuer that draws at most `attempts` codes per booking.
    #[must_use]
    pub fn new(entropy: Box<dyn EntropySource>, attempts: u32) -> Self {
        Self {
            entropy,
            attempts: attempts.max(1),
        }
    }

    /// Draws a fresh code without recording it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Randomness`] if the entropy source fails.
    pub fn generate_code(&mut self) -> Result<String> {
        let mut bytes = [0u8; VERIFICATION_CODE_LEN / 2];
        self.entropy.fill(&mut bytes)?;
        Ok(bytes.iter().map(|b| format!("{b:02X}")).collect())
    }

    /// Draws a code and records it as issued, retrying on collision.
    ///
    /// The code is recorded without a booking; [`Self::bind`] attaches it
    /// once the booking row exists. Both must run in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LowEntropy`] once every drawn code collided with an
    /// issued one, or the underlying randomness or database error.
    pub fn issue(&mut self, conn: &Connection) -> Result<String> {
        let mut stmt = conn.prepare_cached(RESERVE_CODE)?;
        for attempt in 1..=self.attempts {
            let code = self.generate_code()?;
            match stmt.execute([&code]) {
                Ok(_) => return Ok(code),
                Err(e) if is_constraint_violation(&e) => {
                    log::warn!("verification code collision (attempt {attempt} of {})", self.attempts);
                }
                Err(e) => return Err(e.into()),
            }
        }
        log::error!("no unique verification code after {} attempts", self.attempts);
        Err(Error::LowEntropy {
            attempts: self.attempts,
        })
    }

    /// Attaches an issued code to the booking it was drawn for.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn bind(conn: &Connection, code: &str, booking_id: BookingId) -> Result<()> {
        conn.prepare_cached(BIND_CODE)?
            .execute(params![booking_id.value(), code])?;
        Ok(())
    }

    /// Resolves a code, live or retired, to its booking as stored.
    ///
    /// # Errors
    ///
    /// Returns `MISSING_FIELD` for an empty code and `CODE_NOT_FOUND` for a
    /// code that was never issued.
    pub fn lookup_by_code(conn: &Connection, code: &str) -> Result<Booking> {
        let code = normalize_code(code)?;
        Database::get_booking_by_code(conn, &code)?
            .ok_or_else(|| Error::not_found(NotFoundReason::Code, format!("verification code {code}")))
    }

    /// Returns the live code of an open hold, for administrative review.
    ///
    /// # Errors
    ///
    /// Returns `BOOKING_NOT_FOUND` for an unknown id and `NOT_AVAILABLE`
    /// unless the booking is an unexpired hold.
    pub fn code_for_review(conn: &Connection, id: BookingId, now: DateTime<Utc>) -> Result<String> {
        let booking = Database::get_booking(conn, id)?
            .ok_or_else(|| Error::not_found(NotFoundReason::Booking, format!("booking {id}")))?
            .as_of(now);

        match (booking.status(), booking.verification_code) {
            (BookingStatus::AwaitingPayment, Some(code)) => Ok(code),
            _ => Err(Error::refused(
                TransitionRefusal::NotAvailable,
                booking.reference.to_string(),
            )),
        }
    }
}
