//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, engine setup and output formatting.

use crate::error::CliError;
use chrono::{DateTime, NaiveDate, Utc};
use roomhold::database::{resolve_database_path as default_database_path, DATABASE_FILE_NAME};
use roomhold::{Booking, BookingEngine, Config, ConfigBuilder, DatabaseConfig};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
#[allow(dead_code)] // verbose is consumed by the logger in main.rs
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Print results as JSON.
    pub json: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables
/// 2. Project `roomhold.yaml`
/// 3. User config in the data directory
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new();
    if let Some(ref data_dir) = global.data_dir {
        builder = builder.with_data_dir(data_dir);
    }

    builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Resolve the database path from global options.
fn resolve_database_path(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    // Priority: global option > ROOMHOLD_DATA_DIR > ~/.roomhold
    if let Some(ref data_dir) = global.data_dir {
        return Ok(data_dir.join(DATABASE_FILE_NAME));
    }
    default_database_path().map_err(|e| CliError::Config(e.to_string()))
}

/// Open a booking engine with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_engine(global: &GlobalOptions, config: &Config) -> Result<BookingEngine, CliError> {
    let db_path = resolve_database_path(global)?;

    let disable_autoinit = global.disable_autoinit || config.disable_autoinit.unwrap_or(false);
    if !db_path.exists() && disable_autoinit {
        return Err(CliError::NoDataDirectory);
    }

    let mut db_config = DatabaseConfig::new(db_path);

    // Set busy timeout if specified
    if let Some(timeout_seconds) = global.busy_timeout {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds.into()));
    } else {
        db_config = db_config.with_busy_timeout(config.lock_wait());
    }

    BookingEngine::open(db_config, config.engine_config()).map_err(CliError::from)
}

/// Parse a `YYYY-MM-DD` date argument.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("'{s}' is not a YYYY-MM-DD date: {e}"))
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Format an amount in minor units as `units.cents`.
pub fn format_amount(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a booking in the selected output format.
pub fn print_booking(global: &GlobalOptions, booking: &Booking) -> Result<(), CliError> {
    if global.json {
        return print_json(booking);
    }

    println!("{}", booking.reference());
    if global.quiet {
        return Ok(());
    }
    println!("  id:         {}", booking.id());
    println!("  status:     {}", booking.status());
    println!("  room type:  {}", booking.room_type_id());
    println!(
        "  guest:      {} <{}> ({} guest(s))",
        booking.guest_name(),
        booking.guest_email(),
        booking.guest_count()
    );
    println!(
        "  stay:       {} to {} ({} night(s))",
        booking.stay().check_in(),
        booking.stay().check_out(),
        booking.nights()
    );
    println!("  total:      {}", format_amount(booking.total_price()));
    println!("  created:    {}", format_timestamp(booking.created_at()));
    println!("  expires:    {}", format_timestamp(booking.expires_at()));
    if let Some(at) = booking.confirmed_at() {
        println!("  confirmed:  {}", format_timestamp(at));
    }
    if let Some(at) = booking.cancelled_at() {
        println!("  cancelled:  {}", format_timestamp(at));
    }
    if let Some(requests) = booking.special_requests() {
        println!("  requests:   {requests}");
    }
    if let Some(notes) = booking.admin_notes() {
        println!("  notes:      {notes}");
    }
    Ok(())
}
