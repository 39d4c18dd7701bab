//! Booking records and the values they are built from.
//!
//! A [`Booking`] is always read back from the store; callers create one by
//! submitting a [`BookingRequest`] to the engine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, ValidationReason};
use crate::room::RoomTypeId;

/// Maximum guest name length, in characters.
pub const MAX_GUEST_NAME_LEN: usize = 100;

/// Maximum length of special requests and admin notes, in characters.
pub const MAX_NOTE_LEN: usize = 1000;

/// Length of a verification code.
pub const VERIFICATION_CODE_LEN: usize = 8;

/// Identifier of a booking row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(i64);

impl BookingId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// A hold waiting for payment confirmation.
    AwaitingPayment,
    /// Payment confirmed.
    Confirmed,
    /// Cancelled by an administrator.
    Cancelled,
    /// Reclaimed after the hold lapsed.
    Expired,
}

impl BookingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 4] = [
        Self::AwaitingPayment,
        Self::Confirmed,
        Self::Cancelled,
        Self::Expired,
    ];

    /// Returns the stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingPayment => "awaiting_payment",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    /// Returns true for states with no outgoing transition.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::AwaitingPayment)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(
                    ValidationReason::InvalidStatus,
                    "status",
                    format!("unknown booking status '{s}'"),
                )
            })
    }
}

/// A half-open stay interval `[check_in, check_out)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayDates {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayDates {
    /// Creates a stay, rejecting empty or inverted ranges.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_RANGE` unless `check_out` is after `check_in`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use roomhold::StayDates;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2030, 1, day).unwrap();
    /// assert_eq!(StayDates::new(d(1), d(4)).unwrap().nights(), 3);
    /// assert!(StayDates::new(d(4), d(4)).is_err());
    /// ```
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self> {
        if check_out <= check_in {
            return Err(Error::validation(
                ValidationReason::InvalidRange,
                "check_out",
                format!("check-out {check_out} must be after check-in {check_in}"),
            ));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// First night of the stay.
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Departure day; not itself a night of the stay.
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights.
    #[must_use]
    pub fn nights(&self) -> u32 {
        u32::try_from((self.check_out - self.check_in).num_days()).unwrap_or(u32::MAX)
    }

    /// Returns true if the two stays share at least one night.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Returns true if `night` is one of the nights of this stay.
    #[must_use]
    pub fn contains(&self, night: NaiveDate) -> bool {
        self.check_in <= night && night < self.check_out
    }
}

/// A human-facing booking reference such as `FW-2026-00042`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BookingReference {
    prefix: String,
    year: i32,
    sequence: u64,
}

impl BookingReference {
    /// Builds a reference from its parts.
    #[must_use]
    pub fn new(prefix: &str, year: i32, sequence: u64) -> Self {
        Self {
            prefix: prefix.to_ascii_uppercase(),
            year,
            sequence,
        }
    }

    /// Parses `PREFIX-YYYY-NNNNN`, case-insensitively.
    ///
    /// The sequence has at least five digits; wider sequences carry no
    /// leading zero.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_REFERENCE` if the text is not a well-formed reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use roomhold::BookingReference;
    ///
    /// let reference = BookingReference::parse(" fw-2026-00042 ").unwrap();
    /// assert_eq!(reference.to_string(), "FW-2026-00042");
    /// assert_eq!(reference.sequence(), 42);
    /// assert!(BookingReference::parse("FW-26-1").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || {
            Error::validation(
                ValidationReason::InvalidReference,
                "reference",
                format!("'{text}' is not a booking reference"),
            )
        };

        let normalized = text.trim().to_ascii_uppercase();
        let mut parts = normalized.split('-');
        let (Some(prefix), Some(year), Some(sequence), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if prefix.is_empty()
            || prefix.len() > 8
            || !prefix.bytes().all(|b| b.is_ascii_alphanumeric())
            || year.len() != 4
            || !all_digits(year)
            || sequence.len() < 5
            || !all_digits(sequence)
            || (sequence.len() > 5 && sequence.starts_with('0'))
        {
            return Err(invalid());
        }

        Ok(Self {
            prefix: prefix.to_string(),
            year: year.parse().map_err(|_| invalid())?,
            sequence: sequence.parse().map_err(|_| invalid())?,
        })
    }

    /// The configured prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Calendar year the reference was issued in.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Per-year sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for BookingReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:04}-{:05}", self.prefix, self.year, self.sequence)
    }
}

impl FromStr for BookingReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BookingReference {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<BookingReference> for String {
    fn from(reference: BookingReference) -> Self {
        reference.to_string()
    }
}

/// A booking as stored, or as projected at a given instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub(crate) id: BookingId,
    pub(crate) room_type_id: RoomTypeId,
    pub(crate) guest_name: String,
    pub(crate) guest_email: String,
    pub(crate) stay: StayDates,
    pub(crate) guest_count: u32,
    pub(crate) total_price: i64,
    pub(crate) special_requests: Option<String>,
    pub(crate) admin_notes: Option<String>,
    pub(crate) status: BookingStatus,
    pub(crate) reference: BookingReference,
    pub(crate) verification_code: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) expires_at: DateTime<Utc>,
    pub(crate) confirmed_at: Option<DateTime<Utc>>,
    pub(crate) cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Row identifier.
    #[must_use]
    pub const fn id(&self) -> BookingId {
        self.id
    }

    /// Room type booked.
    #[must_use]
    pub const fn room_type_id(&self) -> RoomTypeId {
        self.room_type_id
    }

    /// Guest name as submitted, trimmed.
    #[must_use]
    pub fn guest_name(&self) -> &str {
        &self.guest_name
    }

    /// Guest email, trimmed and lowercased.
    #[must_use]
    pub fn guest_email(&self) -> &str {
        &self.guest_email
    }

    /// The stay interval.
    #[must_use]
    pub const fn stay(&self) -> StayDates {
        self.stay
    }

    /// Number of nights.
    #[must_use]
    pub fn nights(&self) -> u32 {
        self.stay.nights()
    }

    /// Number of guests.
    #[must_use]
    pub const fn guest_count(&self) -> u32 {
        self.guest_count
    }

    /// Total price in minor currency units.
    #[must_use]
    pub const fn total_price(&self) -> i64 {
        self.total_price
    }

    /// Special requests from the guest.
    #[must_use]
    pub fn special_requests(&self) -> Option<&str> {
        self.special_requests.as_deref()
    }

    /// Notes left by an administrator.
    #[must_use]
    pub fn admin_notes(&self) -> Option<&str> {
        self.admin_notes.as_deref()
    }

    /// Lifecycle state.
    #[must_use]
    pub const fn status(&self) -> BookingStatus {
        self.status
    }

    /// Booking reference.
    #[must_use]
    pub const fn reference(&self) -> &BookingReference {
        &self.reference
    }

    /// Verification code; present only while awaiting payment.
    #[must_use]
    pub fn verification_code(&self) -> Option<&str> {
        self.verification_code.as_deref()
    }

    /// Creation instant.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Instant the hold lapses.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Confirmation instant.
    #[must_use]
    pub const fn confirmed_at(&self) -> Option<DateTime<Utc>> {
        self.confirmed_at
    }

    /// Cancellation instant.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// Returns true if the hold is still awaiting payment past its expiry.
    #[must_use]
    pub fn is_lapsed(&self, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::AwaitingPayment && now > self.expires_at
    }

    /// Returns true if the booking counts against capacity at `now`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.status {
            BookingStatus::Confirmed => true,
            BookingStatus::AwaitingPayment => now <= self.expires_at,
            BookingStatus::Cancelled | BookingStatus::Expired => false,
        }
    }

    /// Projects the booking as it must appear at `now`.
    ///
    /// A lapsed hold is shown as expired with no code, whether or not the
    /// sweeper has reached it yet.
    #[must_use]
    pub fn as_of(mut self, now: DateTime<Utc>) -> Self {
        if self.is_lapsed(now) {
            self.status = BookingStatus::Expired;
            self.verification_code = None;
        }
        self
    }
}

/// A request to hold a room.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use roomhold::{BookingRequest, RoomTypeId};
///
/// let request = BookingRequest::new(
///     RoomTypeId::new(1),
///     "Ada Lovelace",
///     "ada@example.com",
///     NaiveDate::from_ymd_opt(2030, 5, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2030, 5, 3).unwrap(),
///     2,
/// )
/// .with_special_requests("late arrival");
///
/// assert_eq!(request.guest_count, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Room type to book.
    pub room_type_id: RoomTypeId,
    /// Guest name.
    pub guest_name: String,
    /// Guest email.
    pub guest_email: String,
    /// First night.
    pub check_in: NaiveDate,
    /// Departure day.
    pub check_out: NaiveDate,
    /// Number of guests.
    pub guest_count: u32,
    /// Optional free-text requests.
    pub special_requests: Option<String>,
}

impl BookingRequest {
    /// Creates a request without special requests.
    #[must_use]
    pub fn new(
        room_type_id: RoomTypeId,
        guest_name: impl Into<String>,
        guest_email: impl Into<String>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        guest_count: u32,
    ) -> Self {
        Self {
            room_type_id,
            guest_name: guest_name.into(),
            guest_email: guest_email.into(),
            check_in,
            check_out,
            guest_count,
            special_requests: None,
        }
    }

    /// Sets the special requests.
    #[must_use]
    pub fn with_special_requests(mut self, requests: impl Into<String>) -> Self {
        self.special_requests = Some(requests.into());
        self
    }

    /// Checks and normalizes the guest-supplied fields.
    ///
    /// Dates and room limits are checked later, against the catalog.
    ///
    /// # Errors
    ///
    /// Returns `MISSING_FIELD`, `FIELD_TOO_LONG`, `INVALID_EMAIL` or
    /// `INVALID_GUEST_COUNT`.
    pub fn normalized(&self) -> Result<Self> {
        let guest_name = self.guest_name.trim();
        if guest_name.is_empty() {
            return Err(Error::validation(
                ValidationReason::MissingField,
                "guest_name",
                "guest name is required",
            ));
        }
        check_length("guest_name", guest_name, MAX_GUEST_NAME_LEN)?;

        let guest_email = normalize_email(&self.guest_email)?;

        if self.guest_count == 0 {
            return Err(Error::validation(
                ValidationReason::InvalidGuestCount,
                "guest_count",
                "at least one guest is required",
            ));
        }

        let special_requests = match self.special_requests.as_deref().map(str::trim) {
            Some("") | None => None,
            Some(text) => {
                check_length("special_requests", text, MAX_NOTE_LEN)?;
                Some(text.to_string())
            }
        };

        Ok(Self {
            room_type_id: self.room_type_id,
            guest_name: guest_name.to_string(),
            guest_email,
            check_in: self.check_in,
            check_out: self.check_out,
            guest_count: self.guest_count,
            special_requests,
        })
    }
}

/// Filter and page for the administrative listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFilter {
    /// Only bookings in this (projected) status.
    pub status: Option<BookingStatus>,
    /// Only bookings for this room type.
    pub room_type_id: Option<RoomTypeId>,
    /// Case-insensitive substring of name, email or reference.
    pub search: Option<String>,
    /// 1-based page number.
    pub page: u32,
    /// Page size, 1 to 100.
    pub limit: u32,
}

impl BookingFilter {
    /// Default page size.
    pub const DEFAULT_LIMIT: u32 = 20;
    /// Largest accepted page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: BookingStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one room type.
    #[must_use]
    pub const fn with_room_type(mut self, room_type_id: RoomTypeId) -> Self {
        self.room_type_id = Some(room_type_id);
        self
    }

    /// Adds a search term.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Selects a page.
    #[must_use]
    pub const fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Rejects out-of-range paging.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FILTER` for page 0 or a limit outside 1 to 100.
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(Error::validation(
                ValidationReason::InvalidFilter,
                "page",
                "page numbers start at 1",
            ));
        }
        if self.limit == 0 || self.limit > Self::MAX_LIMIT {
            return Err(Error::validation(
                ValidationReason::InvalidFilter,
                "limit",
                format!("limit must be between 1 and {}", Self::MAX_LIMIT),
            ));
        }
        Ok(())
    }

    pub(crate) fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for BookingFilter {
    fn default() -> Self {
        Self {
            status: None,
            room_type_id: None,
            search: None,
            page: 1,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// One page of the administrative listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookingPage {
    /// Bookings on this page, newest first.
    pub bookings: Vec<Booking>,
    /// Matching bookings across all pages.
    pub total: u64,
    /// Page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

/// Trims and lowercases an email, rejecting implausible addresses.
///
/// # Errors
///
/// Returns `MISSING_FIELD` for an empty email and `INVALID_EMAIL` otherwise.
pub fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(Error::validation(
            ValidationReason::MissingField,
            "guest_email",
            "email is required",
        ));
    }

    let plausible = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
                && domain
                    .rsplit_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };
    if !plausible {
        return Err(Error::validation(
            ValidationReason::InvalidEmail,
            "guest_email",
            format!("'{email}' is not a valid email address"),
        ));
    }
    Ok(email)
}

/// Trims and uppercases a verification code.
///
/// # Errors
///
/// Returns `MISSING_FIELD` for an empty code.
pub fn normalize_code(code: &str) -> Result<String> {
    let code = code.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(Error::validation(
            ValidationReason::MissingField,
            "verification_code",
            "verification code is required",
        ));
    }
    Ok(code)
}

pub(crate) fn check_length(field: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(Error::validation(
            ValidationReason::FieldTooLong,
            field,
            format!("{field} cannot exceed {max} characters"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod proptests;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 5, d).unwrap()
    }

    fn sample_booking() -> Booking {
        let created = Utc.with_ymd_and_hms(2030, 4, 1, 10, 0, 0).unwrap();
        Booking {
            id: BookingId::new(1),
            room_type_id: RoomTypeId::new(1),
            guest_name: "Ada".into(),
            guest_email: "ada@example.com".into(),
            stay: StayDates::new(day(1), day(3)).unwrap(),
            guest_count: 1,
            total_price: 20_000,
            special_requests: None,
            admin_notes: None,
            status: BookingStatus::AwaitingPayment,
            reference: BookingReference::new("FW", 2030, 1),
            verification_code: Some("0A1B2C3D".into()),
            created_at: created,
            expires_at: created + Duration::hours(6),
            confirmed_at: None,
            cancelled_at: None,
        }
    }

    #[test]
    fn test_status_round_trip_and_terminality() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert_eq!(
            "CONFIRMED".parse::<BookingStatus>().unwrap(),
            BookingStatus::Confirmed
        );
        assert!("pending".parse::<BookingStatus>().is_err());
        assert!(!BookingStatus::AwaitingPayment.is_terminal());
        assert!(BookingStatus::Expired.is_terminal());
    }

    #[test]
    fn test_stay_overlap_is_half_open() {
        let a = StayDates::new(day(1), day(3)).unwrap();
        let b = StayDates::new(day(3), day(5)).unwrap();
        let c = StayDates::new(day(2), day(4)).unwrap();
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(c.overlaps(&b));
        assert!(a.contains(day(2)));
        assert!(!a.contains(day(3)));
    }

    #[test]
    fn test_reference_width_grows_past_five_digits() {
        let reference = BookingReference::new("fw", 2030, 123_456);
        assert_eq!(reference.to_string(), "FW-2030-123456");
        assert_eq!(BookingReference::parse("FW-2030-123456").unwrap(), reference);
        assert!(BookingReference::parse("FW-2030-0123456").is_err());
    }

    #[test]
    fn test_reference_rejects_malformed() {
        for text in ["", "FW", "FW-2030", "FW-2030-1", "FW-2030-00001-1", "-2030-00001", "F W-2030-00001"] {
            let err = BookingReference::parse(text).unwrap_err();
            assert_eq!(err.reason_code(), "INVALID_REFERENCE", "{text}");
        }
    }

    #[test]
    fn test_lazy_expiry_projection() {
        let booking = sample_booking();
        let at_expiry = booking.expires_at();
        assert!(!booking.is_lapsed(at_expiry));
        assert!(booking.is_active(at_expiry));

        let after = at_expiry + Duration::milliseconds(1);
        assert!(booking.is_lapsed(after));
        assert!(!booking.is_active(after));

        let projected = booking.as_of(after);
        assert_eq!(projected.status(), BookingStatus::Expired);
        assert_eq!(projected.verification_code(), None);
    }

    #[test]
    fn test_confirmed_is_never_lapsed() {
        let mut booking = sample_booking();
        booking.status = BookingStatus::Confirmed;
        booking.verification_code = None;
        let far = booking.expires_at() + Duration::days(30);
        assert!(!booking.is_lapsed(far));
        assert_eq!(booking.clone().as_of(far), booking);
    }

    #[test]
    fn test_request_normalization() {
        let request = BookingRequest::new(
            RoomTypeId::new(1),
            "  Ada Lovelace ",
            " Ada@Example.COM ",
            day(1),
            day(2),
            2,
        )
        .with_special_requests("   ");
        let normalized = request.normalized().unwrap();
        assert_eq!(normalized.guest_name, "Ada Lovelace");
        assert_eq!(normalized.guest_email, "ada@example.com");
        assert_eq!(normalized.special_requests, None);
    }

    #[test]
    fn test_request_field_errors() {
        let base = BookingRequest::new(RoomTypeId::new(1), "Ada", "ada@example.com", day(1), day(2), 1);

        let mut r = base.clone();
        r.guest_name = " ".into();
        assert_eq!(r.normalized().unwrap_err().reason_code(), "MISSING_FIELD");

        let mut r = base.clone();
        r.guest_name = "x".repeat(MAX_GUEST_NAME_LEN + 1);
        assert_eq!(r.normalized().unwrap_err().reason_code(), "FIELD_TOO_LONG");

        let mut r = base.clone();
        r.guest_count = 0;
        assert_eq!(r.normalized().unwrap_err().reason_code(), "INVALID_GUEST_COUNT");

        let r = base.clone().with_special_requests("y".repeat(MAX_NOTE_LEN + 1));
        assert_eq!(r.normalized().unwrap_err().reason_code(), "FIELD_TOO_LONG");
    }

    #[test]
    fn test_email_validation() {
        for bad in ["ada", "ada@", "@example.com", "ada@example", "ada@@example.com", "a da@example.com", "ada@example."] {
            assert_eq!(
                normalize_email(bad).unwrap_err().reason_code(),
                "INVALID_EMAIL",
                "{bad}"
            );
        }
        assert_eq!(normalize_email("").unwrap_err().reason_code(), "MISSING_FIELD");
        assert_eq!(normalize_email("a.b@c.example.org").unwrap(), "a.b@c.example.org");
        assert_eq!(normalize_email("A@B.C").unwrap(), "a@b.c");
    }

    #[test]
    fn test_code_normalization() {
        assert_eq!(normalize_code(" ab12cd34 ").unwrap(), "AB12CD34");
        assert_eq!(normalize_code("  ").unwrap_err().reason_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_filter_validation() {
        assert!(BookingFilter::default().validate().is_ok());
        assert!(BookingFilter::default().with_page(0, 20).validate().is_err());
        assert!(BookingFilter::default().with_page(1, 101).validate().is_err());
        assert_eq!(BookingFilter::default().with_page(3, 10).offset(), 20);
    }

    #[test]
    fn test_booking_serializes_reference_as_string() {
        let json = serde_json::to_value(sample_booking()).unwrap();
        assert_eq!(json["reference"], "FW-2030-00001");
        assert_eq!(json["status"], "awaiting_payment");
    }
}
