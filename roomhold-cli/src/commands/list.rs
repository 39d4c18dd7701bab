//! List command implementation.
//!
//! This module implements the `list` command, the administrative listing of
//! bookings with filters and paging.

use crate::error::CliError;
use crate::utils::{format_amount, load_configuration, open_engine, print_json, GlobalOptions};
use clap::Args;
use roomhold::{BookingFilter, BookingStatus, RoomTypeId};

/// List bookings, newest first.
#[derive(Args)]
pub struct ListCommand {
    /// Only bookings in this status
    #[arg(long, value_name = "STATUS")]
    pub status: Option<BookingStatus>,

    /// Only bookings of this room type
    #[arg(long)]
    pub room_type: Option<i64>,

    /// Search guest name, email and reference
    #[arg(long)]
    pub search: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size, 1 to 100
    #[arg(long, default_value_t = BookingFilter::DEFAULT_LIMIT)]
    pub limit: u32,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let mut filter = BookingFilter::default().with_page(self.page, self.limit);
        if let Some(status) = self.status {
            filter = filter.with_status(status);
        }
        if let Some(room_type) = self.room_type {
            filter = filter.with_room_type(RoomTypeId::new(room_type));
        }
        if let Some(search) = self.search {
            filter = filter.with_search(search);
        }

        let page = engine.list_bookings(&filter)?;

        if global.json {
            return print_json(&page);
        }

        if page.bookings.is_empty() {
            if !global.quiet {
                eprintln!("No bookings found");
            }
            return Ok(());
        }

        if !global.quiet {
            println!(
                "{:<6} {:<16} {:<17} {:<5} {:<10} {:<10} {:>10}  GUEST",
                "ID", "REFERENCE", "STATUS", "ROOM", "CHECK-IN", "CHECK-OUT", "TOTAL"
            );
        }
        for booking in &page.bookings {
            println!(
                "{:<6} {:<16} {:<17} {:<5} {:<10} {:<10} {:>10}  {} <{}>",
                booking.id(),
                booking.reference(),
                booking.status(),
                booking.room_type_id(),
                booking.stay().check_in(),
                booking.stay().check_out(),
                format_amount(booking.total_price()),
                booking.guest_name(),
                booking.guest_email()
            );
        }
        if !global.quiet {
            eprintln!(
                "Page {} ({} of {} booking(s))",
                page.page,
                page.bookings.len(),
                page.total
            );
        }
        Ok(())
    }
}
