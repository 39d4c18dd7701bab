//! Room type catalog commands.
//!
//! The catalog is owned outside the booking engine; `room-type set` is the
//! fixture path used to seed it.

use crate::error::CliError;
use crate::utils::{format_amount, load_configuration, open_engine, parse_date, print_json, GlobalOptions};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use roomhold::room::SeasonalDiscount;
use roomhold::{RoomType, RoomTypeId};

/// Manage the room type catalog.
#[derive(Args)]
pub struct RoomTypeCommand {
    #[command(subcommand)]
    pub action: RoomTypeAction,
}

/// Room type subcommands.
#[derive(Subcommand)]
pub enum RoomTypeAction {
    /// Create or update a room type
    Set(SetRoomTypeArgs),

    /// List all room types
    List,
}

/// Arguments for `room-type set`.
#[derive(Args)]
pub struct SetRoomTypeArgs {
    /// Room type id
    #[arg(long)]
    pub id: i64,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Number of units
    #[arg(long)]
    pub capacity: u32,

    /// Guests per unit
    #[arg(long)]
    pub max_guests: u32,

    /// Nightly rate in minor currency units
    #[arg(long)]
    pub price: i64,

    /// Seasonal discount percentage
    #[arg(long, value_name = "PERCENT", requires_all = ["discount_start", "discount_end"])]
    pub discount: Option<u8>,

    /// First day of the discount (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub discount_start: Option<NaiveDate>,

    /// Last day of the discount (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub discount_end: Option<NaiveDate>,

    /// Mark the room type as not bookable
    #[arg(long)]
    pub inactive: bool,
}

impl RoomTypeCommand {
    /// Execute the room-type command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        match self.action {
            RoomTypeAction::Set(args) => {
                let mut room = RoomType::new(
                    RoomTypeId::new(args.id),
                    args.name,
                    args.capacity,
                    args.max_guests,
                    args.price,
                )
                .with_active(!args.inactive);
                if let Some(percentage) = args.discount {
                    room = room.with_discount(SeasonalDiscount {
                        active: true,
                        percentage,
                        start_date: args.discount_start,
                        end_date: args.discount_end,
                    });
                }

                engine.upsert_room_type(&room)?;
                if global.json {
                    print_json(&room)?;
                } else if !global.quiet {
                    eprintln!("Saved room type {} ({})", room.id, room.name);
                }
            }
            RoomTypeAction::List => {
                let rooms = engine.room_types()?;
                if global.json {
                    return print_json(&rooms);
                }
                for room in rooms {
                    let state = if room.active { "" } else { " (inactive)" };
                    println!(
                        "{}\t{}\tunits={}\tguests={}\tnightly={}{state}",
                        room.id,
                        room.name,
                        room.capacity,
                        room.max_guests,
                        format_amount(room.current_price(engine.clock().today())),
                    );
                }
            }
        }
        Ok(())
    }
}
