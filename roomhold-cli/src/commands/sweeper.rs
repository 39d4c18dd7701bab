//! Sweeper command implementation.
//!
//! Runs the periodic expiry sweeper in the foreground.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, GlobalOptions};
use clap::Args;
use roomhold::Sweeper;
use std::sync::mpsc;
use std::time::Duration;

/// Run the expiry sweeper in the foreground.
#[derive(Args)]
pub struct SweeperCommand {
    /// Stop after this many passes (default: run until killed)
    #[arg(long, value_name = "N")]
    pub passes: Option<u64>,

    /// Seconds between passes (overrides configuration)
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<u64>,
}

impl SweeperCommand {
    /// Execute the sweeper command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        if self.passes == Some(0) {
            return Err(CliError::InvalidArguments(
                "--passes must be at least 1".to_string(),
            ));
        }

        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let interval = self
            .interval
            .map_or(engine.config().sweep_interval, Duration::from_secs);
        let mut sweeper = Sweeper::new(interval);
        if let Some(passes) = self.passes {
            sweeper = sweeper.with_max_passes(passes);
        }

        // the sender stays alive for the whole run, so only the pass
        // limit or the process ending stops the loop
        let (_stop, stop_rx) = mpsc::channel();
        if !global.quiet {
            eprintln!("Sweeping every {}s", interval.as_secs());
        }
        let stats = sweeper.run(engine.database(), engine.clock(), &stop_rx);

        if !global.quiet {
            eprintln!(
                "Sweeper finished: {} pass(es), {} hold(s) expired, {} failed pass(es)",
                stats.passes, stats.expired, stats.failures
            );
        }
        println!("{}", stats.expired);
        Ok(())
    }
}
