//! Note command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, print_booking, GlobalOptions};
use clap::Args;
use roomhold::BookingId;

/// Set or clear a booking's admin notes.
#[derive(Args)]
pub struct NoteCommand {
    /// Booking id
    #[arg(long)]
    pub id: i64,

    /// Note text
    #[arg(long, required_unless_present = "clear", conflicts_with = "clear")]
    pub text: Option<String>,

    /// Remove the existing notes
    #[arg(long)]
    pub clear: bool,
}

impl NoteCommand {
    /// Execute the note command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let notes = if self.clear { None } else { self.text.as_deref() };
        let booking = engine.set_admin_notes(BookingId::new(self.id), notes)?;
        print_booking(global, &booking)
    }
}
