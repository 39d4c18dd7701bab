//! Database schema definitions and SQL constants.
//!
//! Dates are stored as ISO `YYYY-MM-DD` text, so text comparison is date
//! comparison. Instants are Unix epoch milliseconds.

/// Current schema version for the database.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// The metadata table stores key-value pairs, currently only the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Room type catalog rows.
pub const CREATE_ROOM_TYPES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS room_types (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        capacity INTEGER NOT NULL CHECK (capacity >= 1),
        max_guests INTEGER NOT NULL CHECK (max_guests >= 1),
        price_per_night INTEGER NOT NULL CHECK (price_per_night >= 0),
        discount_active INTEGER NOT NULL DEFAULT 0,
        discount_percentage INTEGER NOT NULL DEFAULT 0
            CHECK (discount_percentage BETWEEN 0 AND 100),
        discount_start TEXT,
        discount_end TEXT,
        has_discount INTEGER NOT NULL DEFAULT 0,
        active INTEGER NOT NULL DEFAULT 1
    )";

/// One row per booking.
///
/// The last CHECK ties the verification code to the `awaiting_payment`
/// state: a code is present exactly while the hold is open.
pub const CREATE_BOOKINGS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS bookings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        room_type_id INTEGER NOT NULL REFERENCES room_types(id),
        guest_name TEXT NOT NULL,
        guest_email TEXT NOT NULL,
        check_in TEXT NOT NULL,
        check_out TEXT NOT NULL,
        nights INTEGER NOT NULL,
        guest_count INTEGER NOT NULL CHECK (guest_count >= 1),
        total_price INTEGER NOT NULL,
        special_requests TEXT,
        admin_notes TEXT,
        status TEXT NOT NULL
            CHECK (status IN ('awaiting_payment', 'confirmed', 'cancelled', 'expired')),
        booking_reference TEXT NOT NULL UNIQUE,
        verification_code TEXT UNIQUE,
        created_at INTEGER NOT NULL,
        expires_at INTEGER NOT NULL,
        confirmed_at INTEGER,
        cancelled_at INTEGER,
        CHECK (check_out > check_in),
        CHECK ((status = 'awaiting_payment') = (verification_code IS NOT NULL))
    )";

/// Every verification code ever issued, live or retired.
///
/// `booking_id` is NULL only between reserving a code and inserting its
/// booking, inside the same transaction.
pub const CREATE_ISSUED_CODES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS issued_codes (
        code TEXT PRIMARY KEY NOT NULL,
        booking_id INTEGER REFERENCES bookings(id)
    )";

/// Per-year booking reference counters.
pub const CREATE_REFERENCE_COUNTERS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reference_counters (
        year INTEGER PRIMARY KEY NOT NULL,
        last_seq INTEGER NOT NULL
    )";

/// Speeds up overlap counting.
pub const CREATE_ROOM_DATES_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_bookings_room_dates \
     ON bookings(room_type_id, check_in, check_out)";

/// Speeds up status-filtered listings.
pub const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bookings_status ON bookings(status)";

/// Speeds up the sweeper's search for lapsed holds.
pub const CREATE_EXPIRES_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bookings_expires ON bookings(status, expires_at)";

/// Speeds up email lookups.
pub const CREATE_EMAIL_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_bookings_email ON bookings(guest_email)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// The one definition of a booking that holds inventory at instant `:now`.
///
/// Confirmed bookings, and holds whose expiry has not passed. Every query
/// that counts against capacity embeds this predicate.
pub const ACTIVE_BOOKING_PREDICATE: &str =
    "(status = 'confirmed' OR (status = 'awaiting_payment' AND expires_at >= :now))";

/// Columns selected for every booking read, in `row_to_booking` order.
pub const BOOKING_COLUMNS: &str = "id, room_type_id, guest_name, guest_email, check_in, \
     check_out, guest_count, total_price, special_requests, admin_notes, status, \
     booking_reference, verification_code, created_at, expires_at, confirmed_at, cancelled_at";

/// Inserts a new hold.
pub const INSERT_BOOKING: &str = r"
    INSERT INTO bookings
    (room_type_id, guest_name, guest_email, check_in, check_out, nights, guest_count,
     total_price, special_requests, status, booking_reference, verification_code,
     created_at, expires_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'awaiting_payment', ?, ?, ?, ?)
";

/// Confirms an open, unexpired hold. Zero rows affected means the guard failed.
pub const CONFIRM_HOLD: &str = r"
    UPDATE bookings
    SET status = 'confirmed', verification_code = NULL, confirmed_at = :now
    WHERE id = :id AND status = 'awaiting_payment' AND expires_at >= :now
";

/// Expires a lapsed hold. Zero rows affected means another writer won.
pub const EXPIRE_HOLD: &str = r"
    UPDATE bookings
    SET status = 'expired', verification_code = NULL
    WHERE id = :id AND status = 'awaiting_payment' AND expires_at < :now
";

/// Cancels a confirmed booking or an unexpired hold.
///
/// The guard is the active predicate: a lapsed hold is already expired
/// as far as every caller can observe.
pub const CANCEL_BOOKING: &str = r"
    UPDATE bookings
    SET status = 'cancelled', verification_code = NULL, cancelled_at = :now
    WHERE id = :id
      AND (status = 'confirmed' OR (status = 'awaiting_payment' AND expires_at >= :now))
";

/// Atomically advances and returns the reference counter for a year.
pub const NEXT_REFERENCE_SEQUENCE: &str = r"
    INSERT INTO reference_counters (year, last_seq) VALUES (?, 1)
    ON CONFLICT(year) DO UPDATE SET last_seq = last_seq + 1
    RETURNING last_seq
";

/// Inserts or replaces a catalog row.
pub const UPSERT_ROOM_TYPE: &str = r"
    INSERT INTO room_types
    (id, name, capacity, max_guests, price_per_night, has_discount, discount_active,
     discount_percentage, discount_start, discount_end, active)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        capacity = excluded.capacity,
        max_guests = excluded.max_guests,
        price_per_night = excluded.price_per_night,
        has_discount = excluded.has_discount,
        discount_active = excluded.discount_active,
        discount_percentage = excluded.discount_percentage,
        discount_start = excluded.discount_start,
        discount_end = excluded.discount_end,
        active = excluded.active
";

/// Columns selected for every room type read, in `row_to_room_type` order.
pub const ROOM_TYPE_COLUMNS: &str = "id, name, capacity, max_guests, price_per_night, \
     has_discount, discount_active, discount_percentage, discount_start, discount_end, active";
