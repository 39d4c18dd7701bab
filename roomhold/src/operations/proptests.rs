//! Model-based property tests for the engine.
//!
//! Random operation sequences run against a real engine on a manual clock
//! and against a plain in-memory model; every outcome must agree.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

use crate::booking::{Booking, BookingRequest, BookingStatus, StayDates};
use crate::clock::{Clock, ManualClock};
use crate::config::EngineConfig;
use crate::database::test_util::{create_test_database, seed_room_type};
use crate::operations::BookingEngine;
use crate::room::RoomTypeId;

const CAPACITIES: [u32; 2] = [1, 2];

#[derive(Debug, Clone)]
enum Op {
    Create { room: usize, from: i64, nights: i64 },
    Confirm(usize),
    Cancel(usize),
    Advance(i64),
    Sweep,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0..CAPACITIES.len(), 0i64..10, 1i64..4)
            .prop_map(|(room, from, nights)| Op::Create { room, from, nights }),
        2 => any::<usize>().prop_map(Op::Confirm),
        1 => any::<usize>().prop_map(Op::Cancel),
        2 => (0i64..40).prop_map(Op::Advance),
        1 => Just(Op::Sweep),
    ]
}

/// What the model expects of one booking.
struct Modeled {
    booking: Booking,
    status: BookingStatus,
}

impl Modeled {
    fn lapsed(&self, now: chrono::DateTime<Utc>) -> bool {
        self.status == BookingStatus::AwaitingPayment && now > self.booking.expires_at()
    }

    fn active(&self, now: chrono::DateTime<Utc>) -> bool {
        match self.status {
            BookingStatus::Confirmed => true,
            BookingStatus::AwaitingPayment => !self.lapsed(now),
            BookingStatus::Cancelled | BookingStatus::Expired => false,
        }
    }
}

fn base_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 6, 1).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// The engine agrees with the model on every create, confirm, cancel
    /// and sweep, and remaining capacity always matches.
    #[test]
    fn engine_matches_model(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let db = create_test_database();
        for (i, &capacity) in CAPACITIES.iter().enumerate() {
            seed_room_type(&db, i as i64 + 1, capacity, 2, 1_000);
        }
        let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2030, 5, 20, 8, 0, 0).unwrap()));
        let config = EngineConfig {
            hold_duration: Duration::minutes(30),
            ..EngineConfig::default()
        };
        let mut engine = BookingEngine::new(db, config).with_clock(clock.clone());
        let mut model: Vec<Modeled> = Vec::new();

        for op in ops {
            let now = clock.now();
            match op {
                Op::Create { room, from, nights } => {
                    let room_id = RoomTypeId::new(room as i64 + 1);
                    let check_in = base_day() + Duration::days(from);
                    let stay = StayDates::new(check_in, check_in + Duration::days(nights)).unwrap();
                    let taken = model
                        .iter()
                        .filter(|m| m.booking.room_type_id() == room_id)
                        .filter(|m| m.active(now) && m.booking.stay().overlaps(&stay))
                        .count();

                    let result = engine.create_booking(&BookingRequest::new(
                        room_id,
                        "Model Guest",
                        format!("guest{}@example.com", model.len()),
                        stay.check_in(),
                        stay.check_out(),
                        1,
                    ));
                    if taken < CAPACITIES[room] as usize {
                        let booking = result.unwrap();
                        prop_assert_eq!(booking.expires_at(), now + Duration::minutes(30));
                        model.push(Modeled { booking, status: BookingStatus::AwaitingPayment });
                    } else {
                        prop_assert_eq!(result.unwrap_err().reason_code(), "NO_AVAILABILITY");
                    }
                }
                Op::Confirm(pick) if !model.is_empty() => {
                    let len = model.len();
                    let entry = &mut model[pick % len];
                    let code = entry.booking.verification_code().unwrap().to_string();
                    let expected = match entry.status {
                        BookingStatus::Confirmed => Some("ALREADY_CONFIRMED"),
                        BookingStatus::Cancelled | BookingStatus::Expired => Some("TERMINAL_STATE"),
                        BookingStatus::AwaitingPayment if entry.lapsed(now) => Some("EXPIRED"),
                        BookingStatus::AwaitingPayment => None,
                    };
                    let result = engine.confirm(&code, entry.booking.guest_email());
                    match expected {
                        None => {
                            prop_assert_eq!(result.unwrap().status(), BookingStatus::Confirmed);
                            entry.status = BookingStatus::Confirmed;
                        }
                        Some(reason) => prop_assert_eq!(result.unwrap_err().reason_code(), reason),
                    }
                }
                Op::Cancel(pick) if !model.is_empty() => {
                    let len = model.len();
                    let entry = &mut model[pick % len];
                    let result = engine.cancel(entry.booking.id());
                    if entry.status == BookingStatus::Expired || entry.lapsed(now) {
                        prop_assert_eq!(result.unwrap_err().reason_code(), "TERMINAL_STATE");
                    } else {
                        prop_assert_eq!(result.unwrap().status(), BookingStatus::Cancelled);
                        entry.status = BookingStatus::Cancelled;
                    }
                }
                Op::Advance(minutes) => clock.advance(Duration::minutes(minutes)),
                Op::Sweep => {
                    let report = engine.sweep().unwrap();
                    let mut expected = 0;
                    for entry in model.iter_mut().filter(|m| m.lapsed(now)) {
                        entry.status = BookingStatus::Expired;
                        expected += 1;
                    }
                    prop_assert_eq!(report.expired, expected);
                }
                Op::Confirm(_) | Op::Cancel(_) => {}
            }

            let now = clock.now();
            for (i, &capacity) in CAPACITIES.iter().enumerate() {
                let room_id = RoomTypeId::new(i as i64 + 1);
                let stay = StayDates::new(base_day(), base_day() + Duration::days(1)).unwrap();
                let taken = model
                    .iter()
                    .filter(|m| m.booking.room_type_id() == room_id)
                    .filter(|m| m.active(now) && m.booking.stay().overlaps(&stay))
                    .count() as u32;
                let availability = engine
                    .query_availability(room_id, stay.check_in(), stay.check_out())
                    .unwrap();
                prop_assert_eq!(availability.remaining, capacity.saturating_sub(taken));
            }
        }
    }
}
