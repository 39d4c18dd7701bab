//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    ApproveCommand, AvailabilityCommand, BookCommand, CancelCommand, ConfirmCommand, ListCommand,
    NoteCommand, ReviewCodeCommand, RoomTypeCommand, ShowCommand, SweepCommand, SweeperCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for room holds and bookings.
#[derive(Parser)]
#[command(name = "roomhold")]
#[command(version, about = "Manage room holds and bookings", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "ROOMHOLD_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "ROOMHOLD_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true)]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Manage the room type catalog
    RoomType(RoomTypeCommand),

    /// Place a hold on a room
    Book(BookCommand),

    /// Show free units for a date range
    Availability(AvailabilityCommand),

    /// Confirm a hold with its verification code
    Confirm(ConfirmCommand),

    /// Show a booking
    Show(ShowCommand),

    /// Show the live verification code of a hold
    ReviewCode(ReviewCodeCommand),

    /// Cancel a booking
    Cancel(CancelCommand),

    /// Confirm a hold without its code
    Approve(ApproveCommand),

    /// Set or clear admin notes
    Note(NoteCommand),

    /// List bookings
    List(ListCommand),

    /// Expire lapsed holds once
    Sweep(SweepCommand),

    /// Run the expiry sweeper in the foreground
    Sweeper(SweeperCommand),
}
