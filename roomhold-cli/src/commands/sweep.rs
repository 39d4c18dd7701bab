//! Sweep command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, print_json, GlobalOptions};
use clap::Args;

/// Expire every lapsed hold now.
#[derive(Args)]
pub struct SweepCommand {
    /// Report what would expire without changing anything
    #[arg(long)]
    pub dry_run: bool,
}

impl SweepCommand {
    /// Execute the sweep command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let report = if self.dry_run {
            engine.sweep_preview()?
        } else {
            engine.sweep()?
        };

        if global.json {
            return print_json(&report);
        }

        for booking in &report.bookings {
            println!("{}", booking.reference());
        }
        if !global.quiet {
            if report.dry_run {
                eprintln!("Dry run - would expire {} hold(s)", report.expired);
            } else {
                eprintln!(
                    "Expired {} hold(s), {} already transitioned",
                    report.expired, report.skipped
                );
            }
        }
        Ok(())
    }
}
