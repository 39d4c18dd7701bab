//! Confirm command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, print_booking, GlobalOptions};
use clap::Args;

/// Confirm a hold with its verification code.
#[derive(Args)]
pub struct ConfirmCommand {
    /// Verification code
    #[arg(long)]
    pub code: String,

    /// Guest email the hold was made with
    #[arg(long)]
    pub email: String,
}

impl ConfirmCommand {
    /// Execute the confirm command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let booking = engine.confirm(&self.code, &self.email)?;
        if !global.quiet && !global.json {
            eprintln!("Confirmed {}", booking.reference());
        }
        print_booking(global, &booking)
    }
}
