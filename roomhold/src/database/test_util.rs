//! Shared test utilities for database unit tests.

use tempfile::tempdir;

use crate::database::{Database, DatabaseConfig};
use crate::room::{RoomType, RoomTypeId};

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    db
}

/// Seeds an active room type without discount.
///
/// # Panics
///
/// Panics if the room type cannot be written.
pub fn seed_room_type(db: &Database, id: i64, capacity: u32, max_guests: u32, price: i64) -> RoomTypeId {
    let room_id = RoomTypeId::new(id);
    db.upsert_room_type(&RoomType::new(
        room_id,
        format!("Room type {id}"),
        capacity,
        max_guests,
        price,
    ))
    .unwrap();
    room_id
}
