//! Property-based tests for stays and booking references.

use super::{BookingReference, StayDates};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

fn stay_strategy() -> impl Strategy<Value = StayDates> {
    (0i64..400, 1i64..30).prop_map(|(offset, nights)| {
        let base = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let check_in = base + Duration::days(offset);
        StayDates::new(check_in, check_in + Duration::days(nights)).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn overlap_is_symmetric(a in stay_strategy(), b in stay_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    // Two stays overlap exactly when they share a night.
    #[test]
    fn overlap_matches_shared_night(a in stay_strategy(), b in stay_strategy()) {
        let mut night = a.check_in();
        let mut shared = false;
        while night < a.check_out() {
            if b.contains(night) {
                shared = true;
                break;
            }
            night += Duration::days(1);
        }
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    #[test]
    fn stay_overlaps_itself(a in stay_strategy()) {
        prop_assert!(a.overlaps(&a));
    }

    #[test]
    fn reference_parses_its_own_display(
        prefix in "[A-Z0-9]{1,8}",
        year in 1970i32..=9999,
        sequence in 1u64..10_000_000,
    ) {
        let reference = BookingReference::new(&prefix, year, sequence);
        let text = reference.to_string();
        prop_assert!(text.len() >= prefix.len() + 11);
        prop_assert_eq!(BookingReference::parse(&text.to_lowercase()).unwrap(), reference);
    }

    #[test]
    fn references_order_by_sequence_within_year(a in 1u64..100_000, b in 1u64..100_000) {
        let ra = BookingReference::new("FW", 2030, a).to_string();
        let rb = BookingReference::new("FW", 2030, b).to_string();
        prop_assert_eq!(a.cmp(&b), ra.cmp(&rb));
    }
}
