//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `room_type`: Seed and list the room type catalog
//! - `book`: Place a hold
//! - `availability`: Show free units for a range
//! - `confirm`: Confirm a hold with its code
//! - `show`: Show a booking by reference or id
//! - `review_code`: Show the live code of a hold
//! - `cancel`: Cancel a booking
//! - `approve`: Confirm a hold without its code
//! - `note`: Set or clear admin notes
//! - `list`: List bookings
//! - `sweep`: Expire lapsed holds once
//! - `sweeper`: Run the periodic sweeper

pub mod approve;
pub mod availability;
pub mod book;
pub mod cancel;
pub mod confirm;
pub mod list;
pub mod note;
pub mod review_code;
pub mod room_type;
pub mod show;
pub mod sweep;
pub mod sweeper;

pub use approve::ApproveCommand;
pub use availability::AvailabilityCommand;
pub use book::BookCommand;
pub use cancel::CancelCommand;
pub use confirm::ConfirmCommand;
pub use list::ListCommand;
pub use note::NoteCommand;
pub use review_code::ReviewCodeCommand;
pub use room_type::RoomTypeCommand;
pub use show::ShowCommand;
pub use sweep::SweepCommand;
pub use sweeper::SweeperCommand;
