//! Cancel command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, print_booking, GlobalOptions};
use clap::Args;
use roomhold::BookingId;

/// Cancel a hold or a confirmed booking.
#[derive(Args)]
pub struct CancelCommand {
    /// Booking id
    #[arg(long)]
    pub id: i64,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let booking = engine.cancel(BookingId::new(self.id))?;
        if !global.quiet && !global.json {
            eprintln!("Cancelled {}", booking.reference());
        }
        print_booking(global, &booking)
    }
}
