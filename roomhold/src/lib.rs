#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # roomhold
//!
//! A library for capacity-checked room holds and their booking lifecycle.
//!
//! A hold takes one unit of a room type for a date range while the guest
//! pays. It is confirmed with a single-use verification code, or it lapses
//! and is reclaimed by the expiry sweeper. Capacity is never oversold, no
//! matter how many workers create holds at once.
//!
//! ## Core Types
//!
//! - [`BookingEngine`]: the entry point for every operation
//! - [`Booking`], [`BookingStatus`] and [`BookingReference`]: booking records
//! - [`RoomType`] and [`RoomCatalog`]: the inventory catalog
//! - [`Clock`] and [`EntropySource`]: injectable time and randomness
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use roomhold::{BookingReference, StayDates};
//! use chrono::NaiveDate;
//!
//! let reference = BookingReference::parse("fw-2030-00042").unwrap();
//! assert_eq!(reference.to_string(), "FW-2030-00042");
//!
//! let day = |d| NaiveDate::from_ymd_opt(2030, 6, d).unwrap();
//! let first = StayDates::new(day(1), day(4)).unwrap();
//! let second = StayDates::new(day(4), day(6)).unwrap();
//! assert!(!first.overlaps(&second));
//! ```

pub mod booking;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod operations;
pub mod room;

// Re-export key types at crate root for convenience
pub use booking::{
    Booking, BookingFilter, BookingId, BookingPage, BookingReference, BookingRequest,
    BookingStatus, StayDates,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigBuilder, EngineConfig};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, ErrorKind, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    Availability, BookingEngine, EntropySource, OsEntropy, SweepReport, Sweeper, SweeperHandle,
};
pub use room::{RoomCatalog, RoomType, RoomTypeId};
