//! Show command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, print_booking, GlobalOptions};
use clap::Args;
use roomhold::BookingId;

/// Show a booking by reference or id.
#[derive(Args)]
pub struct ShowCommand {
    /// Booking reference (e.g. FW-2030-00001)
    #[arg(required_unless_present = "id", conflicts_with = "id")]
    pub reference: Option<String>,

    /// Booking id
    #[arg(long)]
    pub id: Option<i64>,
}

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let booking = match (self.reference, self.id) {
            (Some(reference), _) => engine.fetch_by_reference(&reference)?,
            (None, Some(id)) => engine.get_booking(BookingId::new(id))?,
            (None, None) => {
                return Err(CliError::InvalidArguments(
                    "a reference or --id is required".to_string(),
                ))
            }
        };
        print_booking(global, &booking)
    }
}
