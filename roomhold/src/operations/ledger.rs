//! Inventory ledger: overlap counting and the capacity gate.
//!
//! A stay `[a1, b1)` overlaps `[a2, b2)` iff `a1 < b2 && a2 < b1`. The
//! ledger counts active overlapping bookings of a room type and only lets a
//! new hold through while that count is below capacity.
//!
//! ## Atomicity
//!
//! [`InventoryLedger::check_and_reserve`] runs the count, the decision and
//! the insert inside one `BEGIN IMMEDIATE` transaction. The write lock is
//! held from before the count until after the commit, so two concurrent
//! callers can never both observe spare capacity for the same last unit.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, Transaction};
use serde::Serialize;

use crate::booking::{Booking, StayDates};
use crate::clock::Clock;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::room::{RoomCatalog, RoomType, RoomTypeId};

/// Answer to an availability query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Availability {
    /// Room type queried.
    pub room_type_id: RoomTypeId,
    /// First night queried.
    pub check_in: NaiveDate,
    /// Departure day queried.
    pub check_out: NaiveDate,
    /// Units of the room type.
    pub capacity: u32,
    /// Units still free for the whole range.
    pub remaining: u32,
    /// Whether at least one unit is free.
    pub available: bool,
}

/// Capacity gate in front of booking creation.
#[derive(Debug, Clone, Copy)]
pub struct InventoryLedger {
    reserve_attempts: u32,
}

impl InventoryLedger {
    /// Creates a ledger that retries a busy write lock `reserve_attempts` times.
    #[must_use]
    pub const fn new(reserve_attempts: u32) -> Self {
        Self { reserve_attempts }
    }

    /// Counts free units for a range without writing anything.
    ///
    /// Lapsed holds are not counted, whether or not they were swept.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_RANGE` for an empty or inverted range,
    /// `ROOM_TYPE_NOT_FOUND` for an unknown or inactive room type, or a
    /// database error.
    pub fn available_count(
        conn: &Connection,
        room_type_id: RoomTypeId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Availability> {
        let stay = StayDates::new(check_in, check_out)?;
        let room = conn.bookable_room_type(room_type_id)?;
        let active = Database::count_active_overlaps(conn, room_type_id, &stay, now)?;
        let remaining = room.capacity.saturating_sub(active);

        Ok(Availability {
            room_type_id,
            check_in,
            check_out,
            capacity: room.capacity,
            remaining,
            available: remaining > 0,
        })
    }

    /// Atomically checks capacity and, if a unit is free, materializes a hold.
    ///
    /// `materialize` runs inside the serialized transaction with the room
    /// type as re-read under the lock and the instant the lock was taken.
    /// Whatever it writes commits together with the capacity decision, or
    /// not at all.
    ///
    /// # Errors
    ///
    /// Returns `NO_AVAILABILITY` when every unit is taken,
    /// `ROOM_TYPE_NOT_FOUND` if the room type vanished, `LOCK_TIMEOUT` when
    /// the write lock stayed busy through every attempt, or the error
    /// `materialize` returned.
    pub fn check_and_reserve<F>(
        &self,
        db: &mut Database,
        room_type_id: RoomTypeId,
        stay: &StayDates,
        clock: &dyn Clock,
        mut materialize: F,
    ) -> Result<Booking>
    where
        F: FnMut(&Transaction<'_>, &RoomType, DateTime<Utc>) -> Result<Booking>,
    {
        let booking = db.with_immediate_transaction(self.reserve_attempts, |tx| {
            let now = clock.now();
            let room = tx.bookable_room_type(room_type_id)?;
            let active = Database::count_active_overlaps(tx, room_type_id, stay, now)?;

            if active >= room.capacity {
                log::info!(
                    "no availability for room type {room_type_id} from {} to {} ({active}/{})",
                    stay.check_in(),
                    stay.check_out(),
                    room.capacity
                );
                return Err(Error::NoAvailability {
                    room_type: room_type_id.value(),
                    check_in: stay.check_in(),
                    check_out: stay.check_out(),
                });
            }

            materialize(tx, &room, now)
        })?;

        log::info!(
            "reserved {} for room type {room_type_id} from {} to {}",
            booking.reference(),
            stay.check_in(),
            stay.check_out()
        );
        Ok(booking)
    }
}

impl Default for InventoryLedger {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_RESERVE_ATTEMPTS)
    }
}
