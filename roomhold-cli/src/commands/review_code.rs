//! Review-code command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, print_json, GlobalOptions};
use clap::Args;
use roomhold::BookingId;
use serde::Serialize;

/// Show the live verification code of an open hold.
#[derive(Args)]
pub struct ReviewCodeCommand {
    /// Booking id
    #[arg(long)]
    pub id: i64,
}

#[derive(Serialize)]
struct CodeReview {
    id: BookingId,
    verification_code: String,
}

impl ReviewCodeCommand {
    /// Execute the review-code command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let id = BookingId::new(self.id);
        let code = engine.code_for_review(id)?;
        log::info!("verification code of booking {id} reviewed");

        if global.json {
            return print_json(&CodeReview {
                id,
                verification_code: code,
            });
        }
        println!("{code}");
        Ok(())
    }
}
