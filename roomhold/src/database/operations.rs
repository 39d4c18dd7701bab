//! Row-level reads and writes for bookings and room types.
//!
//! Most functions take a plain `&Connection` so they can run either in
//! autocommit mode or inside a transaction opened by the caller.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{named_params, params, Connection, OptionalExtension};

use crate::booking::{
    Booking, BookingFilter, BookingId, BookingPage, BookingReference, BookingStatus, StayDates,
};
use crate::error::{Error, Result};
use crate::room::{RoomCatalog, RoomType, RoomTypeId, SeasonalDiscount};

use super::connection::Database;
use super::schema::{
    ACTIVE_BOOKING_PREDICATE, BOOKING_COLUMNS, CANCEL_BOOKING, CONFIRM_HOLD, EXPIRE_HOLD,
    INSERT_BOOKING, ROOM_TYPE_COLUMNS, UPSERT_ROOM_TYPE,
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shared WHERE clause of the admin listing and its count.
///
/// Status matching follows the lazy-expiry projection: a lapsed hold is
/// listed as expired, not as awaiting payment.
const LISTING_FILTER: &str = r"
    (:status IS NULL
        OR (:status = 'awaiting_payment' AND status = 'awaiting_payment' AND expires_at >= :now)
        OR (:status = 'expired'
            AND (status = 'expired' OR (status = 'awaiting_payment' AND expires_at < :now)))
        OR (:status IN ('confirmed', 'cancelled') AND status = :status))
    AND (:room IS NULL OR room_type_id = :room)
    AND (:search IS NULL
        OR lower(guest_name) LIKE :search ESCAPE '\'
        OR guest_email LIKE :search ESCAPE '\'
        OR lower(booking_reference) LIKE :search ESCAPE '\')
";

const UPDATE_ADMIN_NOTES: &str = "UPDATE bookings SET admin_notes = ? WHERE id = ?";

/// Fields of a hold about to be inserted.
#[derive(Debug)]
pub(crate) struct NewBooking<'a> {
    pub room_type_id: RoomTypeId,
    pub guest_name: &'a str,
    pub guest_email: &'a str,
    pub stay: StayDates,
    pub guest_count: u32,
    pub total_price: i64,
    pub special_requests: Option<&'a str>,
    pub reference: &'a BookingReference,
    pub verification_code: &'a str,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

pub(crate) fn date_to_sql(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn sql_to_date(idx: usize, text: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn millis_to_datetime(idx: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
}

fn conversion_failure(idx: usize, err: Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

/// Deserializes a booking from a row selected with [`BOOKING_COLUMNS`].
fn row_to_booking(row: &rusqlite::Row<'_>) -> rusqlite::Result<Booking> {
    let check_in = sql_to_date(4, &row.get::<_, String>(4)?)?;
    let check_out = sql_to_date(5, &row.get::<_, String>(5)?)?;
    let stay = StayDates::new(check_in, check_out).map_err(|e| conversion_failure(5, e))?;

    let status: BookingStatus = row
        .get::<_, String>(10)?
        .parse()
        .map_err(|e| conversion_failure(10, e))?;
    let reference =
        BookingReference::parse(&row.get::<_, String>(11)?).map_err(|e| conversion_failure(11, e))?;

    Ok(Booking {
        id: BookingId::new(row.get(0)?),
        room_type_id: RoomTypeId::new(row.get(1)?),
        guest_name: row.get(2)?,
        guest_email: row.get(3)?,
        stay,
        guest_count: row.get(6)?,
        total_price: row.get(7)?,
        special_requests: row.get(8)?,
        admin_notes: row.get(9)?,
        status,
        reference,
        verification_code: row.get(12)?,
        created_at: millis_to_datetime(13, row.get(13)?)?,
        expires_at: millis_to_datetime(14, row.get(14)?)?,
        confirmed_at: row
            .get::<_, Option<i64>>(15)?
            .map(|ms| millis_to_datetime(15, ms))
            .transpose()?,
        cancelled_at: row
            .get::<_, Option<i64>>(16)?
            .map(|ms| millis_to_datetime(16, ms))
            .transpose()?,
    })
}

/// Deserializes a room type from a row selected with [`ROOM_TYPE_COLUMNS`].
fn row_to_room_type(row: &rusqlite::Row<'_>) -> rusqlite::Result<RoomType> {
    let has_discount: bool = row.get(5)?;
    let discount = if has_discount {
        Some(SeasonalDiscount {
            active: row.get(6)?,
            percentage: row.get(7)?,
            start_date: row
                .get::<_, Option<String>>(8)?
                .map(|s| sql_to_date(8, &s))
                .transpose()?,
            end_date: row
                .get::<_, Option<String>>(9)?
                .map(|s| sql_to_date(9, &s))
                .transpose()?,
        })
    } else {
        None
    };

    Ok(RoomType {
        id: RoomTypeId::new(row.get(0)?),
        name: row.get(1)?,
        capacity: row.get(2)?,
        max_guests: row.get(3)?,
        price_per_night: row.get(4)?,
        discount,
        active: row.get(10)?,
    })
}

fn escape_like(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

impl Database {
    /// Inserts or replaces a room type in the catalog.
    ///
    /// This is the administrative seeding path; the engine itself only
    /// reads the catalog.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an inconsistent row, or a database
    /// error if the write fails.
    pub fn upsert_room_type(&self, room: &RoomType) -> Result<()> {
        room.validate()?;
        let discount = room.discount.as_ref();
        self.conn.execute(
            UPSERT_ROOM_TYPE,
            params![
                room.id.value(),
                room.name.trim(),
                room.capacity,
                room.max_guests,
                room.price_per_night,
                discount.is_some(),
                discount.is_some_and(|d| d.active),
                discount.map_or(0, |d| d.percentage),
                discount.and_then(|d| d.start_date).map(date_to_sql),
                discount.and_then(|d| d.end_date).map(date_to_sql),
                room.active,
            ],
        )?;
        log::info!("room type {} saved with capacity {}", room.id, room.capacity);
        Ok(())
    }

    /// Looks up a room type by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_room_type(conn: &Connection, id: RoomTypeId) -> Result<Option<RoomType>> {
        let sql = format!("SELECT {ROOM_TYPE_COLUMNS} FROM room_types WHERE id = ?");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row([id.value()], row_to_room_type).optional()?)
    }

    /// Lists all room types ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_room_types(conn: &Connection) -> Result<Vec<RoomType>> {
        let sql = format!("SELECT {ROOM_TYPE_COLUMNS} FROM room_types ORDER BY id");
        let mut stmt = conn.prepare(&sql)?;
        let rooms = stmt
            .query_map([], row_to_room_type)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rooms)
    }

    /// Inserts a hold and returns its id.
    pub(crate) fn insert_booking(conn: &Connection, booking: &NewBooking<'_>) -> Result<BookingId> {
        let mut stmt = conn.prepare_cached(INSERT_BOOKING)?;
        stmt.execute(params![
            booking.room_type_id.value(),
            booking.guest_name,
            booking.guest_email,
            date_to_sql(booking.stay.check_in()),
            date_to_sql(booking.stay.check_out()),
            booking.stay.nights(),
            booking.guest_count,
            booking.total_price,
            booking.special_requests,
            booking.reference.to_string(),
            booking.verification_code,
            booking.created_at.timestamp_millis(),
            booking.expires_at.timestamp_millis(),
        ])?;
        Ok(BookingId::new(conn.last_insert_rowid()))
    }

    /// Fetches a booking as stored, without lazy-expiry projection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_booking(conn: &Connection, id: BookingId) -> Result<Option<Booking>> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row([id.value()], row_to_booking).optional()?)
    }

    /// Fetches a booking by reference, as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_booking_by_reference(
        conn: &Connection,
        reference: &BookingReference,
    ) -> Result<Option<Booking>> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE booking_reference = ?");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt
            .query_row([reference.to_string()], row_to_booking)
            .optional()?)
    }

    /// Fetches the booking a code was issued to, live or retired.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_booking_by_code(conn: &Connection, code: &str) -> Result<Option<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE id = (SELECT booking_id FROM issued_codes WHERE code = ?)"
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row([code], row_to_booking).optional()?)
    }

    /// Counts bookings of a room type that overlap `stay` and hold
    /// inventory at `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_overlaps(
        conn: &Connection,
        room_type_id: RoomTypeId,
        stay: &StayDates,
        now: DateTime<Utc>,
    ) -> Result<u32> {
        let sql = format!(
            "SELECT COUNT(*) FROM bookings \
             WHERE room_type_id = :room AND check_in < :check_out AND :check_in < check_out \
             AND {ACTIVE_BOOKING_PREDICATE}"
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let count: u32 = stmt.query_row(
            named_params! {
                ":room": room_type_id.value(),
                ":check_in": date_to_sql(stay.check_in()),
                ":check_out": date_to_sql(stay.check_out()),
                ":now": now.timestamp_millis(),
            },
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Lists holds still awaiting payment whose expiry is before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_lapsed_holds(conn: &Connection, now: DateTime<Utc>) -> Result<Vec<Booking>> {
        let sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings \
             WHERE status = 'awaiting_payment' AND expires_at < ? ORDER BY expires_at, id"
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let bookings = stmt
            .query_map([now.timestamp_millis()], row_to_booking)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(bookings)
    }

    /// Lists one page of bookings, newest first, as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_bookings(
        conn: &Connection,
        filter: &BookingFilter,
        now: DateTime<Utc>,
    ) -> Result<BookingPage> {
        let status = filter.status.map(BookingStatus::as_str);
        let room = filter.room_type_id.map(RoomTypeId::value);
        let search = filter
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(escape_like);
        let now = now.timestamp_millis();

        let count_sql = format!("SELECT COUNT(*) FROM bookings WHERE {LISTING_FILTER}");
        let total: i64 = conn.query_row(
            &count_sql,
            named_params! {
                ":status": status,
                ":now": now,
                ":room": room,
                ":search": search,
            },
            |row| row.get(0),
        )?;

        let page_sql = format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE {LISTING_FILTER} \
             ORDER BY created_at DESC, id DESC LIMIT :limit OFFSET :offset"
        );
        let mut stmt = conn.prepare(&page_sql)?;
        let bookings = stmt
            .query_map(
                named_params! {
                    ":status": status,
                    ":now": now,
                    ":room": room,
                    ":search": search,
                    ":limit": filter.limit,
                    ":offset": i64::try_from(filter.offset()).unwrap_or(i64::MAX),
                },
                row_to_booking,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(BookingPage {
            bookings,
            total: u64::try_from(total).unwrap_or(0),
            page: filter.page,
            limit: filter.limit,
        })
    }

    /// Confirms an open, unexpired hold. Returns false if the guard failed.
    pub(crate) fn mark_confirmed(conn: &Connection, id: BookingId, now: DateTime<Utc>) -> Result<bool> {
        let changed = conn.execute(
            CONFIRM_HOLD,
            named_params! { ":id": id.value(), ":now": now.timestamp_millis() },
        )?;
        Ok(changed == 1)
    }

    /// Expires a lapsed hold. Returns false if the guard failed.
    pub(crate) fn mark_expired(conn: &Connection, id: BookingId, now: DateTime<Utc>) -> Result<bool> {
        let changed = conn.execute(
            EXPIRE_HOLD,
            named_params! { ":id": id.value(), ":now": now.timestamp_millis() },
        )?;
        Ok(changed == 1)
    }

    /// Cancels a hold or confirmed booking. Returns false if the guard failed.
    pub(crate) fn mark_cancelled(conn: &Connection, id: BookingId, now: DateTime<Utc>) -> Result<bool> {
        let changed = conn.execute(
            CANCEL_BOOKING,
            named_params! { ":id": id.value(), ":now": now.timestamp_millis() },
        )?;
        Ok(changed == 1)
    }

    /// Replaces the admin notes. Returns false if the booking does not exist.
    pub(crate) fn update_admin_notes(
        conn: &Connection,
        id: BookingId,
        notes: Option<&str>,
    ) -> Result<bool> {
        let changed = conn.execute(UPDATE_ADMIN_NOTES, params![notes, id.value()])?;
        Ok(changed == 1)
    }
}

impl RoomCatalog for Connection {
    fn room_type(&self, id: RoomTypeId) -> Result<Option<RoomType>> {
        Database::get_room_type(self, id)
    }
}

impl RoomCatalog for Database {
    fn room_type(&self, id: RoomTypeId) -> Result<Option<RoomType>> {
        Database::get_room_type(&self.conn, id)
    }
}
