//! Book command implementation.
//!
//! Places a hold and prints its reference and verification code.

use crate::error::CliError;
use crate::utils::{
    format_amount, format_timestamp, load_configuration, open_engine, parse_date, print_json,
    GlobalOptions,
};
use chrono::NaiveDate;
use clap::Args;
use roomhold::{BookingRequest, RoomTypeId};

/// Place a hold on a room.
#[derive(Args)]
pub struct BookCommand {
    /// Room type id
    #[arg(long)]
    pub room_type: i64,

    /// Guest name
    #[arg(long)]
    pub name: String,

    /// Guest email
    #[arg(long)]
    pub email: String,

    /// First night (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub check_in: NaiveDate,

    /// Departure day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub check_out: NaiveDate,

    /// Number of guests
    #[arg(long, default_value_t = 1)]
    pub guests: u32,

    /// Special requests
    #[arg(long)]
    pub requests: Option<String>,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut engine = open_engine(global, &config)?;

        let mut request = BookingRequest::new(
            RoomTypeId::new(self.room_type),
            self.name,
            self.email,
            self.check_in,
            self.check_out,
            self.guests,
        );
        if let Some(requests) = self.requests {
            request = request.with_special_requests(requests);
        }

        let booking = engine.create_booking(&request)?;

        if global.json {
            return print_json(&booking);
        }

        // stdout carries the reference and code so scripts can read them
        println!("{}", booking.reference());
        println!("{}", booking.verification_code().unwrap_or_default());
        if !global.quiet {
            eprintln!(
                "Held room type {} from {} to {} for {}; confirm before {}",
                booking.room_type_id(),
                booking.stay().check_in(),
                booking.stay().check_out(),
                format_amount(booking.total_price()),
                format_timestamp(booking.expires_at())
            );
        }
        Ok(())
    }
}
