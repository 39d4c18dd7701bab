//! The hold/booking state machine.
//!
//! ```text
//!                    confirm / admin_confirm
//!   awaiting_payment ───────────────────────▶ confirmed ──┐
//!        │   │                                            │ cancel
//!        │   └──────── sweep (after expiry) ──▶ expired   ▼
//!        └──────────── cancel ───────────────────────▶ cancelled
//! ```
//!
//! Every transition out of `awaiting_payment` is a single guarded UPDATE
//! run in autocommit mode. The guard re-states the precondition, so when
//! two writers race for the same row exactly one sees a row affected; the
//! loser re-reads the row and reports why it lost.

use chrono::{DateTime, Datelike, Duration, Utc};
use rusqlite::{Connection, Transaction};

use crate::booking::{
    check_length, normalize_code, Booking, BookingFilter, BookingId, BookingPage,
    BookingReference, BookingRequest, BookingStatus, StayDates, MAX_NOTE_LEN,
};
use crate::database::{Database, NewBooking};
use crate::error::{Error, NotFoundReason, Result, TransitionRefusal, ValidationReason};
use crate::room::{RoomCatalog, RoomType};

use super::code::VerificationCodeIssuer;
use super::reference::ReferenceGenerator;

/// Transitions and reads of booking records.
///
/// All operations are static methods working on a connection.
pub struct Lifecycle;

impl Lifecycle {
    /// Validates a request against the catalog and the calendar.
    ///
    /// Checks run in order: guest fields, room type, `PAST_DATE`,
    /// `INVALID_RANGE`, `OVER_CAPACITY_GUESTS`. Returns the normalized
    /// request, the room type and the stay.
    ///
    /// # Errors
    ///
    /// Returns the first failed check.
    pub fn validate_request(
        catalog: &dyn RoomCatalog,
        request: &BookingRequest,
        now: DateTime<Utc>,
    ) -> Result<(BookingRequest, RoomType, StayDates)> {
        let request = request.normalized()?;
        let room = catalog.bookable_room_type(request.room_type_id)?;

        let today = now.date_naive();
        if request.check_in < today {
            return Err(Error::validation(
                ValidationReason::PastDate,
                "check_in",
                format!("check-in {} is before today ({today})", request.check_in),
            ));
        }

        let stay = StayDates::new(request.check_in, request.check_out)?;

        if request.guest_count > room.max_guests {
            return Err(Error::validation(
                ValidationReason::OverCapacityGuests,
                "guest_count",
                format!(
                    "{} guests exceed the limit of {} for {}",
                    request.guest_count, room.max_guests, room.name
                ),
            ));
        }

        Ok((request, room, stay))
    }

    /// Writes a new hold inside the reservation transaction.
    ///
    /// Generates the reference and the verification code, prices the stay
    /// at today's rate and sets the expiry `hold` after `now`. Returns the
    /// booking as stored.
    ///
    /// # Errors
    ///
    /// Returns any reference, code or database error; the caller's
    /// transaction then rolls everything back.
    #[allow(clippy::too_many_arguments)]
    pub fn materialize(
        tx: &Transaction<'_>,
        request: &BookingRequest,
        room: &RoomType,
        stay: &StayDates,
        now: DateTime<Utc>,
        hold: Duration,
        references: &ReferenceGenerator,
        issuer: &mut VerificationCodeIssuer,
    ) -> Result<Booking> {
        let total_price = room.quote(stay, now.date_naive())?;
        let expires_at = now.checked_add_signed(hold).ok_or_else(|| Error::InvalidConfig {
            field: "hold_duration_minutes".into(),
            message: format!("a hold of {} minutes overflows the expiry instant", hold.num_minutes()),
        })?;
        let reference = references.generate(tx, now.year())?;
        let code = issuer.issue(tx)?;

        let id = Database::insert_booking(
            tx,
            &NewBooking {
                room_type_id: room.id,
                guest_name: &request.guest_name,
                guest_email: &request.guest_email,
                stay: *stay,
                guest_count: request.guest_count,
                total_price,
                special_requests: request.special_requests.as_deref(),
                reference: &reference,
                verification_code: &code,
                created_at: now,
                expires_at,
            },
        )?;
        VerificationCodeIssuer::bind(tx, &code, id)?;

        Self::stored(tx, id)
    }

    /// Confirms a hold with the guest's code and email.
    ///
    /// # Errors
    ///
    /// Returns `MISSING_FIELD` for an empty code or email, then in priority
    /// order `CODE_NOT_FOUND`, `ALREADY_CONFIRMED`, `TERMINAL_STATE`,
    /// `EXPIRED`, `EMAIL_MISMATCH`.
    pub fn confirm(conn: &Connection, code: &str, email: &str, now: DateTime<Utc>) -> Result<Booking> {
        let code = normalize_code(code)?;
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(Error::validation(
                ValidationReason::MissingField,
                "guest_email",
                "email is required",
            ));
        }

        let booking = VerificationCodeIssuer::lookup_by_code(conn, &code)?;
        if let Some(reason) = Self::confirm_refusal(&booking, now) {
            return Err(Self::refuse(reason, &booking));
        }
        if booking.guest_email != email {
            log::debug!("confirm of {} refused: email mismatch", booking.reference);
            return Err(Self::refuse(TransitionRefusal::EmailMismatch, &booking));
        }

        Self::apply_confirm(conn, &booking, now)
    }

    /// Confirms a hold without the code, as a manual payment override.
    ///
    /// # Errors
    ///
    /// Returns `BOOKING_NOT_FOUND`, `ALREADY_CONFIRMED`, `TERMINAL_STATE`
    /// or `EXPIRED`.
    pub fn admin_confirm(conn: &Connection, id: BookingId, now: DateTime<Utc>) -> Result<Booking> {
        let booking = Self::require(conn, id)?;
        if let Some(reason) = Self::confirm_refusal(&booking, now) {
            return Err(Self::refuse(reason, &booking));
        }
        Self::apply_confirm(conn, &booking, now)
    }

    /// Cancels a booking. Cancelling a cancelled booking is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `BOOKING_NOT_FOUND` for an unknown id and `TERMINAL_STATE`
    /// for an expired booking or a lapsed hold.
    pub fn cancel(conn: &Connection, id: BookingId, now: DateTime<Utc>) -> Result<Booking> {
        let booking = Self::require(conn, id)?.as_of(now);
        match booking.status {
            BookingStatus::Cancelled => return Ok(booking),
            BookingStatus::Expired => {
                return Err(Self::refuse(TransitionRefusal::TerminalState, &booking))
            }
            BookingStatus::AwaitingPayment | BookingStatus::Confirmed => {}
        }

        if Database::mark_cancelled(conn, id, now)? {
            log::info!("cancelled {} (was {})", booking.reference, booking.status);
            return Self::stored(conn, id);
        }

        // lost to a concurrent writer
        let current = Self::stored(conn, id)?.as_of(now);
        match current.status {
            BookingStatus::Cancelled => Ok(current),
            _ => Err(Self::refuse(TransitionRefusal::TerminalState, &current)),
        }
    }

    /// Sets or clears the admin notes. Lifecycle fields are untouched.
    ///
    /// # Errors
    ///
    /// Returns `FIELD_TOO_LONG` for notes over 1000 characters and
    /// `BOOKING_NOT_FOUND` for an unknown id.
    pub fn set_admin_notes(
        conn: &Connection,
        id: BookingId,
        notes: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Booking> {
        let notes = notes.map(str::trim).filter(|n| !n.is_empty());
        if let Some(notes) = notes {
            check_length("admin_notes", notes, MAX_NOTE_LEN)?;
        }
        if !Database::update_admin_notes(conn, id, notes)? {
            return Err(Self::booking_not_found(id));
        }
        Ok(Self::stored(conn, id)?.as_of(now))
    }

    /// Fetches a booking by id, projected at `now`.
    ///
    /// # Errors
    ///
    /// Returns `BOOKING_NOT_FOUND` for an unknown id.
    pub fn get(conn: &Connection, id: BookingId, now: DateTime<Utc>) -> Result<Booking> {
        Ok(Self::require(conn, id)?.as_of(now))
    }

    /// Fetches a booking by reference, projected at `now`.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_REFERENCE` for malformed text and
    /// `REFERENCE_NOT_FOUND` for an unknown reference.
    pub fn fetch_by_reference(conn: &Connection, reference: &str, now: DateTime<Utc>) -> Result<Booking> {
        let reference = BookingReference::parse(reference)?;
        Database::get_booking_by_reference(conn, &reference)?
            .map(|booking| booking.as_of(now))
            .ok_or_else(|| {
                Error::not_found(NotFoundReason::Reference, format!("booking {reference}"))
            })
    }

    /// Lists bookings for administrators, projected at `now`.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FILTER` for bad paging, or a database error.
    pub fn list(conn: &Connection, filter: &BookingFilter, now: DateTime<Utc>) -> Result<BookingPage> {
        filter.validate()?;
        let mut page = Database::list_bookings(conn, filter, now)?;
        page.bookings = page
            .bookings
            .into_iter()
            .map(|booking| booking.as_of(now))
            .collect();
        Ok(page)
    }

    /// Why a booking cannot be confirmed at `now`, if it cannot.
    fn confirm_refusal(booking: &Booking, now: DateTime<Utc>) -> Option<TransitionRefusal> {
        match booking.status {
            BookingStatus::Confirmed => Some(TransitionRefusal::AlreadyConfirmed),
            BookingStatus::Cancelled | BookingStatus::Expired => Some(TransitionRefusal::TerminalState),
            BookingStatus::AwaitingPayment if booking.is_lapsed(now) => {
                Some(TransitionRefusal::Expired)
            }
            BookingStatus::AwaitingPayment => None,
        }
    }

    fn apply_confirm(conn: &Connection, booking: &Booking, now: DateTime<Utc>) -> Result<Booking> {
        if Database::mark_confirmed(conn, booking.id, now)? {
            log::info!("confirmed {}", booking.reference);
            return Self::stored(conn, booking.id);
        }

        // lost to a concurrent confirm, sweep or cancel
        let current = Self::stored(conn, booking.id)?;
        let reason = Self::confirm_refusal(&current, now).ok_or_else(|| {
            Self::corruption(format!("guarded confirm of {} matched no row", current.reference))
        })?;
        log::debug!("confirm of {} lost a race: {}", current.reference, reason.code());
        Err(Self::refuse(reason, &current))
    }

    fn refuse(reason: TransitionRefusal, booking: &Booking) -> Error {
        Error::refused(reason, booking.reference.to_string())
    }

    fn booking_not_found(id: BookingId) -> Error {
        Error::not_found(NotFoundReason::Booking, format!("booking {id}"))
    }

    fn require(conn: &Connection, id: BookingId) -> Result<Booking> {
        Database::get_booking(conn, id)?.ok_or_else(|| Self::booking_not_found(id))
    }

    /// Reads back a row that must exist.
    fn stored(conn: &Connection, id: BookingId) -> Result<Booking> {
        Database::get_booking(conn, id)?
            .ok_or_else(|| Self::corruption(format!("booking {id} vanished")))
    }

    fn corruption(details: String) -> Error {
        log::error!("database corruption: {details}");
        Error::DatabaseCorruption { details }
    }
}
