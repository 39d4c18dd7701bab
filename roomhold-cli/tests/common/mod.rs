//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - Fixtures for room types and holds

use assert_cmd::Command;
use chrono::{Duration, NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Environment variables that would leak host configuration into a test.
const HOST_VARIABLES: [&str; 10] = [
    "ROOMHOLD_DATA_DIR",
    "ROOMHOLD_BUSY_TIMEOUT",
    "ROOMHOLD_LOG_MODE",
    "ROOMHOLD_HOLD_DURATION_MINUTES",
    "ROOMHOLD_SWEEP_INTERVAL_SECONDS",
    "ROOMHOLD_REFERENCE_PREFIX",
    "ROOMHOLD_CODE_ATTEMPTS",
    "ROOMHOLD_RESERVE_ATTEMPTS",
    "ROOMHOLD_MAXIMUM_LOCK_WAIT_SECONDS",
    "ROOMHOLD_DISABLE_AUTOINIT",
];

/// A hold as printed by `roomhold book`.
#[derive(Debug, Clone)]
pub struct Hold {
    pub reference: String,
    pub code: String,
}

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the roomhold data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; roomhold creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("roomhold-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Get a bare command builder without `--data-dir`.
    ///
    /// Runs inside the temp directory with host `ROOMHOLD_*` variables removed.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("roomhold").expect("Failed to find roomhold binary");
        cmd.current_dir(&self.temp_path);
        for var in HOST_VARIABLES {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Seed a room type.
    pub fn seed_room(&self, id: i64, capacity: u32, max_guests: u32, price: i64) {
        self.command()
            .args(["room-type", "set", "--id", &id.to_string(), "--name"])
            .arg(format!("Room {id}"))
            .args(["--capacity", &capacity.to_string()])
            .args(["--max-guests", &max_guests.to_string()])
            .args(["--price", &price.to_string()])
            .assert()
            .success();
    }

    /// Place a hold and return its reference and code.
    ///
    /// # Panics
    /// Panics if the book command fails.
    pub fn book(&self, room: i64, email: &str, check_in: NaiveDate, check_out: NaiveDate) -> Hold {
        let output = self
            .command()
            .args(["book", "--room-type", &room.to_string()])
            .args(["--name", "Test Guest", "--email", email])
            .args(["--check-in", &check_in.to_string()])
            .args(["--check-out", &check_out.to_string()])
            .output()
            .expect("Failed to run book command");

        assert!(
            output.status.success(),
            "Book failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8(output.stdout).expect("Invalid UTF-8 in output");
        let mut lines = stdout.lines();
        Hold {
            reference: lines.next().expect("missing reference").trim().to_string(),
            code: lines.next().expect("missing code").trim().to_string(),
        }
    }

    /// Look up a booking id by reference through `show --json`.
    pub fn booking_id(&self, reference: &str) -> i64 {
        let output = self
            .command()
            .args(["--json", "show", reference])
            .output()
            .expect("Failed to run show command");
        assert!(output.status.success());
        let booking: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("show printed invalid JSON");
        booking["id"].as_i64().expect("booking id missing")
    }
}

/// A date `days` from today (UTC).
pub fn days_from_now(days: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days)
}
