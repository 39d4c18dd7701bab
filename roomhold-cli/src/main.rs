//! Main entry point for the roomhold CLI.
//!
//! This is the command-line interface over the booking engine. It provides
//! commands for the guest flow and for administration:
//! - `book`, `confirm`, `show`, `availability`: the guest flow
//! - `review-code`, `cancel`, `approve`, `note`, `list`: administration
//! - `sweep`, `sweeper`: hold expiry
//! - `room-type`: catalog fixtures

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    if let Err(e) = roomhold::init_logger(cli.verbose, cli.quiet).install() {
        eprintln!("Warning: logging unavailable: {e}");
    }

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        json: cli.json,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::RoomType(cmd) => cmd.execute(&global),
        cli::Command::Book(cmd) => cmd.execute(&global),
        cli::Command::Availability(cmd) => cmd.execute(&global),
        cli::Command::Confirm(cmd) => cmd.execute(&global),
        cli::Command::Show(cmd) => cmd.execute(&global),
        cli::Command::ReviewCode(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::Approve(cmd) => cmd.execute(&global),
        cli::Command::Note(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Sweep(cmd) => cmd.execute(&global),
        cli::Command::Sweeper(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
