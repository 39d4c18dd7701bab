//! Availability command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, parse_date, print_json, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use roomhold::RoomTypeId;

/// Show free units of a room type for a date range.
#[derive(Args)]
pub struct AvailabilityCommand {
    /// Room type id
    #[arg(long)]
    pub room_type: i64,

    /// First night (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub check_in: NaiveDate,

    /// Departure day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub check_out: NaiveDate,
}

impl AvailabilityCommand {
    /// Execute the availability command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let availability = engine.query_availability(
            RoomTypeId::new(self.room_type),
            self.check_in,
            self.check_out,
        )?;

        if global.json {
            return print_json(&availability);
        }

        println!("{}", availability.remaining);
        if !global.quiet {
            eprintln!(
                "{} of {} unit(s) free from {} to {}",
                availability.remaining, availability.capacity, self.check_in, self.check_out
            );
        }
        Ok(())
    }
}
