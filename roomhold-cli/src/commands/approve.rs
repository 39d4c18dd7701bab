//! Approve command implementation.
//!
//! Manual payment override: confirms a hold without its code.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, print_booking, GlobalOptions};
use clap::Args;
use roomhold::BookingId;

/// Confirm a hold without its verification code.
#[derive(Args)]
pub struct ApproveCommand {
    /// Booking id
    #[arg(long)]
    pub id: i64,
}

impl ApproveCommand {
    /// Execute the approve command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let booking = engine.admin_confirm(BookingId::new(self.id))?;
        if !global.quiet && !global.json {
            eprintln!("Approved {}", booking.reference());
        }
        print_booking(global, &booking)
    }
}
