//! Room types and the catalog the engine reads them from.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::booking::StayDates;
use crate::error::{Error, Result, ValidationReason};

/// Identifier of a room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomTypeId(i64);

impl RoomTypeId {
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

impl fmt::Display for RoomTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A time-bounded percentage discount on the nightly rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalDiscount {
    /// Whether the discount is switched on at all.
    pub active: bool,
    /// Percentage taken off the nightly rate, 0 to 100.
    pub percentage: u8,
    /// First day the discount applies.
    pub start_date: Option<NaiveDate>,
    /// Last day the discount applies.
    pub end_date: Option<NaiveDate>,
}

impl SeasonalDiscount {
    /// Returns true if the discount applies on `date`.
    ///
    /// An active discount without both bounds never applies.
    #[must_use]
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        match (self.active, self.start_date, self.end_date) {
            (true, Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }
}

/// A bookable category of interchangeable room units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    /// Catalog identifier.
    pub id: RoomTypeId,
    /// Display name.
    pub name: String,
    /// Number of interchangeable units.
    pub capacity: u32,
    /// Guests a single unit accommodates.
    pub max_guests: u32,
    /// Nightly rate in minor currency units.
    pub price_per_night: i64,
    /// Optional seasonal discount.
    pub discount: Option<SeasonalDiscount>,
    /// Inactive room types cannot be booked.
    pub active: bool,
}

impl RoomType {
    /// Creates an active room type with no discount.
    #[must_use]
    pub fn new(
        id: RoomTypeId,
        name: impl Into<String>,
        capacity: u32,
        max_guests: u32,
        price_per_night: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            capacity,
            max_guests,
            price_per_night,
            discount: None,
            active: true,
        }
    }

    /// Attaches a seasonal discount.
    #[must_use]
    pub fn with_discount(mut self, discount: SeasonalDiscount) -> Self {
        self.discount = Some(discount);
        self
    }

    /// Marks the room type active or inactive.
    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Checks the catalog row for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty name, zero capacity or guest
    /// limit, a negative price, or a discount above 100 percent or with
    /// inverted bounds.
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &str, message: &str| {
            Err(Error::validation(ValidationReason::InvalidRoomType, field, message))
        };

        if self.name.trim().is_empty() {
            return invalid("name", "room type name cannot be empty");
        }
        if self.capacity == 0 {
            return invalid("capacity", "capacity must be at least 1");
        }
        if self.max_guests == 0 {
            return invalid("max_guests", "max_guests must be at least 1");
        }
        if self.price_per_night < 0 {
            return invalid("price_per_night", "price cannot be negative");
        }
        if let Some(discount) = &self.discount {
            if discount.percentage > 100 {
                return invalid("discount.percentage", "percentage must be 0 to 100");
            }
            if let (Some(start), Some(end)) = (discount.start_date, discount.end_date) {
                if end < start {
                    return invalid("discount.end_date", "discount ends before it starts");
                }
            }
        }
        Ok(())
    }

    /// Returns the nightly rate in effect on `today`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use roomhold::room::{RoomType, RoomTypeId, SeasonalDiscount};
    ///
    /// let day = |d| NaiveDate::from_ymd_opt(2030, 6, d).unwrap();
    /// let room = RoomType::new(RoomTypeId::new(1), "Garden", 4, 2, 10_000)
    ///     .with_discount(SeasonalDiscount {
    ///         active: true,
    ///         percentage: 25,
    ///         start_date: Some(day(1)),
    ///         end_date: Some(day(30)),
    ///     });
    ///
    /// assert_eq!(room.current_price(day(15)), 7_500);
    /// assert_eq!(room.current_price(NaiveDate::from_ymd_opt(2030, 7, 1).unwrap()), 10_000);
    /// ```
    #[must_use]
    pub fn current_price(&self, today: NaiveDate) -> i64 {
        match &self.discount {
            Some(discount) if discount.applies_on(today) => {
                // split the rate so the percentage product cannot overflow
                let pct = i64::from(discount.percentage.min(100));
                let (whole, rest) = (self.price_per_night / 100, self.price_per_night % 100);
                self.price_per_night - (whole * pct + rest * pct / 100)
            }
            _ => self.price_per_night,
        }
    }

    /// Prices a stay at the rate in effect on `today`.
    ///
    /// # Errors
    ///
    /// Returns `INVALID_ROOM_TYPE` if the total does not fit in an `i64`.
    pub fn quote(&self, stay: &StayDates, today: NaiveDate) -> Result<i64> {
        self.current_price(today)
            .checked_mul(i64::from(stay.nights()))
            .ok_or_else(|| {
                Error::validation(
                    ValidationReason::InvalidRoomType,
                    "price_per_night",
                    format!("{} nights of {} overflow the total price", stay.nights(), self.name),
                )
            })
    }
}

/// Read-only access to room types.
///
/// The catalog is owned by an outside collaborator; the engine only reads
/// capacity, guest limits and pricing from it.
pub trait RoomCatalog {
    /// Looks up a room type, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    fn room_type(&self, id: RoomTypeId) -> Result<Option<RoomType>>;

    /// Looks up a room type that can currently be booked.
    ///
    /// # Errors
    ///
    /// Returns `ROOM_TYPE_NOT_FOUND` for unknown or inactive room types.
    fn bookable_room_type(&self, id: RoomTypeId) -> Result<RoomType> {
        match self.room_type(id)? {
            Some(room) if room.active => Ok(room),
            _ => Err(Error::not_found(
                crate::error::NotFoundReason::RoomType,
                format!("room type {id}"),
            )),
        }
    }
}
