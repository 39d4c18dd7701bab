//! Common test utilities for integration tests.
//!
//! This module provides helper functions and fixture builders for testing
//! the roomhold library: temporary databases, a shared manual clock and
//! booking request fixtures.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use roomhold::room::{RoomType, RoomTypeId};
use roomhold::{BookingEngine, BookingRequest, DatabaseConfig, EngineConfig, ManualClock};
use tempfile::TempDir;

/// The instant every test clock starts at.
#[allow(dead_code)]
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 3, 1, 12, 0, 0).unwrap()
}

/// A date `days` after the first day of the test clock.
#[allow(dead_code)]
pub fn day(days: i64) -> NaiveDate {
    start_instant().date_naive() + Duration::days(days)
}

/// A database file in a temporary directory, plus the clock shared by
/// every engine opened on it.
pub struct TestStore {
    #[allow(dead_code)]
    temp_dir: TempDir,
    pub path: PathBuf,
    pub clock: Arc<ManualClock>,
    pub config: EngineConfig,
}

#[allow(dead_code)]
impl TestStore {
    /// Creates a store with default engine settings.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a store with the given engine settings.
    pub fn with_config(config: EngineConfig) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp_dir.path().join("roomhold.db");
        Self {
            temp_dir,
            path,
            clock: Arc::new(ManualClock::new(start_instant())),
            config,
        }
    }

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens an engine with its own connection and the shared clock.
    pub fn engine(&self) -> BookingEngine {
        self.engine_with_timeout(StdDuration::from_secs(5))
    }

    /// Opens an engine with a custom busy timeout.
    pub fn engine_with_timeout(&self, busy_timeout: StdDuration) -> BookingEngine {
        BookingEngine::open(
            DatabaseConfig::new(&self.path).with_busy_timeout(busy_timeout),
            self.config.clone(),
        )
        .expect("Failed to open engine")
        .with_clock(self.clock.clone())
    }

    /// Opens an engine on its own clock, frozen at `now`.
    pub fn engine_at(&self, now: DateTime<Utc>) -> BookingEngine {
        BookingEngine::open(DatabaseConfig::new(&self.path), self.config.clone())
            .expect("Failed to open engine")
            .with_clock(Arc::new(ManualClock::new(now)))
    }

    /// Seeds an active room type without discount.
    pub fn seed_room(&self, id: i64, capacity: u32, max_guests: u32, price: i64) -> RoomTypeId {
        let room = RoomTypeId::new(id);
        self.engine()
            .upsert_room_type(&RoomType::new(
                room,
                format!("Room type {id}"),
                capacity,
                max_guests,
                price,
            ))
            .expect("Failed to seed room type");
        room
    }
}

/// Builds a one-guest request for `room` from day `from` to day `to`.
#[allow(dead_code)]
pub fn request(room: RoomTypeId, email: &str, from: i64, to: i64) -> BookingRequest {
    BookingRequest::new(room, "Test Guest", email, day(from), day(to), 1)
}
