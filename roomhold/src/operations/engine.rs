//! The booking engine facade.
//!
//! One engine owns one database connection. Workers that need to run in
//! parallel each open their own engine on the same file.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::booking::{Booking, BookingFilter, BookingId, BookingPage, BookingRequest};
use crate::clock::{Clock, SystemClock};
use crate::config::EngineConfig;
use crate::database::{Database, DatabaseConfig};
use crate::error::{ErrorKind, Result};
use crate::room::{RoomType, RoomTypeId};

use super::code::{EntropySource, OsEntropy, VerificationCodeIssuer};
use super::ledger::{Availability, InventoryLedger};
use super::lifecycle::Lifecycle;
use super::reference::ReferenceGenerator;
use super::sweeper::{SweepReport, Sweeper, SweeperHandle};

/// Entry point for every booking operation.
///
/// # Examples
///
/// ```no_run
/// use chrono::{Duration, Utc};
/// use roomhold::{BookingEngine, BookingRequest, DatabaseConfig, EngineConfig};
/// use roomhold::room::{RoomType, RoomTypeId};
///
/// let mut engine =
///     BookingEngine::open(DatabaseConfig::new("/tmp/roomhold.db"), EngineConfig::default())
///         .unwrap();
/// engine
///     .upsert_room_type(&RoomType::new(RoomTypeId::new(1), "Double", 4, 2, 12_000))
///     .unwrap();
///
/// let today = Utc::now().date_naive();
/// let hold = engine
///     .create_booking(&BookingRequest::new(
///         RoomTypeId::new(1),
///         "Ada Lovelace",
///         "ada@example.com",
///         today + Duration::days(7),
///         today + Duration::days(9),
///         2,
///     ))
///     .unwrap();
///
/// let code = hold.verification_code().unwrap().to_string();
/// let confirmed = engine.confirm(&code, "ada@example.com").unwrap();
/// assert!(confirmed.verification_code().is_none());
/// ```
pub struct BookingEngine {
    db: Database,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    issuer: VerificationCodeIssuer,
    references: ReferenceGenerator,
    ledger: InventoryLedger,
}

impl fmt::Debug for BookingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BookingEngine")
            .field("db", &self.db)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BookingEngine {
    /// Opens the database and builds an engine on the system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(db_config: DatabaseConfig, config: EngineConfig) -> Result<Self> {
        let db = surfaced("opening the booking store", Database::open(db_config))?;
        Ok(Self::new(db, config))
    }

    /// Builds an engine on an open database.
    #[must_use]
    pub fn new(db: Database, config: EngineConfig) -> Self {
        Self {
            issuer: VerificationCodeIssuer::new(Box::new(OsEntropy), config.code_attempts),
            references: ReferenceGenerator::new(config.reference_prefix.clone()),
            ledger: InventoryLedger::new(config.reserve_attempts),
            clock: Arc::new(SystemClock),
            db,
            config,
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the random source behind verification codes.
    #[must_use]
    pub fn with_entropy(mut self, entropy: Box<dyn EntropySource>) -> Self {
        self.issuer = VerificationCodeIssuer::new(entropy, self.config.code_attempts);
        self
    }

    /// The settings this engine runs with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying database.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// The engine's clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Seeds or updates a catalog row.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_ROOM_TYPE` for an inconsistent row, or a database error.
    pub fn upsert_room_type(&self, room: &RoomType) -> Result<()> {
        surfaced("upsert_room_type", self.db.upsert_room_type(room))
    }

    /// Lists the catalog.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn room_types(&self) -> Result<Vec<RoomType>> {
        surfaced("room_types", Database::list_room_types(self.db.connection()))
    }

    /// Places a hold on one unit of a room type.
    ///
    /// The request is validated first; the capacity check, reference,
    /// verification code and insert then commit as one transaction.
    ///
    /// # Errors
    ///
    /// Returns a validation error, `ROOM_TYPE_NOT_FOUND`,
    /// `NO_AVAILABILITY`, `LOCK_TIMEOUT`, `LOW_ENTROPY`, or a database error.
    pub fn create_booking(&mut self, request: &BookingRequest) -> Result<Booking> {
        let (request, room, stay) = surfaced(
            "create_booking",
            Lifecycle::validate_request(&self.db, request, self.clock.now()),
        )?;

        let hold = self.config.hold_duration;
        let references = &self.references;
        let issuer = &mut self.issuer;
        let created = self.ledger.check_and_reserve(
            &mut self.db,
            room.id,
            &stay,
            self.clock.as_ref(),
            |tx, room, now| {
                Lifecycle::materialize(tx, &request, room, &stay, now, hold, references, issuer)
            },
        );
        surfaced("create_booking", created)
    }

    /// Reports free units of a room type for a range.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_RANGE`, `ROOM_TYPE_NOT_FOUND`, or a database error.
    pub fn query_availability(
        &self,
        room_type_id: RoomTypeId,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<Availability> {
        let availability = InventoryLedger::available_count(
            self.db.connection(),
            room_type_id,
            check_in,
            check_out,
            self.clock.now(),
        );
        surfaced("query_availability", availability)
    }

    /// Confirms a hold with the guest's code and email.
    ///
    /// # Errors
    ///
    /// Returns `MISSING_FIELD`, `CODE_NOT_FOUND`, `ALREADY_CONFIRMED`,
    /// `TERMINAL_STATE`, `EXPIRED` or `EMAIL_MISMATCH`.
    pub fn confirm(&self, code: &str, email: &str) -> Result<Booking> {
        surfaced(
            "confirm",
            Lifecycle::confirm(self.db.connection(), code, email, self.clock.now()),
        )
    }

    /// Fetches a booking by its public reference.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_REFERENCE` or `REFERENCE_NOT_FOUND`.
    pub fn fetch_by_reference(&self, reference: &str) -> Result<Booking> {
        surfaced(
            "fetch_by_reference",
            Lifecycle::fetch_by_reference(self.db.connection(), reference, self.clock.now()),
        )
    }

    /// Resolves a verification code, live or retired, to its booking.
    ///
    /// # Errors
    ///
    /// Returns `MISSING_FIELD` or `CODE_NOT_FOUND`.
    pub fn lookup_by_code(&self, code: &str) -> Result<Booking> {
        let booking = surfaced(
            "lookup_by_code",
            VerificationCodeIssuer::lookup_by_code(self.db.connection(), code),
        )?;
        Ok(booking.as_of(self.clock.now()))
    }

    /// Fetches a booking by id.
    ///
    /// # Errors
    ///
    /// Returns `BOOKING_NOT_FOUND`.
    pub fn get_booking(&self, id: BookingId) -> Result<Booking> {
        surfaced(
            "get_booking",
            Lifecycle::get(self.db.connection(), id, self.clock.now()),
        )
    }

    /// Returns the live code of an open hold.
    ///
    /// # Errors
    ///
    /// Returns `BOOKING_NOT_FOUND` or `NOT_AVAILABLE`.
    pub fn code_for_review(&self, id: BookingId) -> Result<String> {
        surfaced(
            "code_for_review",
            VerificationCodeIssuer::code_for_review(self.db.connection(), id, self.clock.now()),
        )
    }

    /// Cancels a hold or a confirmed booking. Cancelling twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `BOOKING_NOT_FOUND` or `TERMINAL_STATE`.
    pub fn cancel(&self, id: BookingId) -> Result<Booking> {
        surfaced(
            "cancel",
            Lifecycle::cancel(self.db.connection(), id, self.clock.now()),
        )
    }

    /// Confirms a hold without its code, as a manual payment override.
    ///
    /// # Errors
    ///
    /// Returns `BOOKING_NOT_FOUND`, `ALREADY_CONFIRMED`, `TERMINAL_STATE` or
    /// `EXPIRED`.
    pub fn admin_confirm(&self, id: BookingId) -> Result<Booking> {
        surfaced(
            "admin_confirm",
            Lifecycle::admin_confirm(self.db.connection(), id, self.clock.now()),
        )
    }

    /// Sets or clears a booking's admin notes.
    ///
    /// # Errors
    ///
    /// Returns `FIELD_TOO_LONG` or `BOOKING_NOT_FOUND`.
    pub fn set_admin_notes(&self, id: BookingId, notes: Option<&str>) -> Result<Booking> {
        surfaced(
            "set_admin_notes",
            Lifecycle::set_admin_notes(self.db.connection(), id, notes, self.clock.now()),
        )
    }

    /// Lists bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FILTER` or a database error.
    pub fn list_bookings(&self, filter: &BookingFilter) -> Result<BookingPage> {
        surfaced(
            "list_bookings",
            Lifecycle::list(self.db.connection(), filter, self.clock.now()),
        )
    }

    /// Runs one expiry pass now.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn sweep(&self) -> Result<SweepReport> {
        surfaced(
            "sweep",
            Sweeper::sweep(self.db.connection(), self.clock.now(), false),
        )
    }

    /// Reports what a sweep would expire without writing.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub fn sweep_preview(&self) -> Result<SweepReport> {
        surfaced(
            "sweep_preview",
            Sweeper::sweep(self.db.connection(), self.clock.now(), true),
        )
    }

    /// Starts the periodic sweeper on its own connection and thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the second connection cannot be opened.
    pub fn spawn_sweeper(&self) -> Result<SweeperHandle> {
        let db = surfaced("spawn_sweeper", self.db.reopen())?;
        log::info!(
            "starting sweeper every {}s",
            self.config.sweep_interval.as_secs()
        );
        Ok(Sweeper::new(self.config.sweep_interval).spawn(db, Arc::clone(&self.clock)))
    }
}

/// Logs a system error at the facade before handing it back. Other errors
/// pass through unlogged.
fn surfaced<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        if e.kind() == ErrorKind::System {
            log::error!("{operation} failed: {e}");
        }
    }
    result
}
