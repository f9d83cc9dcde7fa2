//! Property-based tests using proptest.
//!
//! These verify invariants that should hold for *any* generated window,
//! reservation layout or click sequence, not just the handpicked examples
//! in the other test files.

use booking_engine::freetime::has_free_time_in_day;
use booking_engine::overnight::{OvernightAvailability, RangeSelection};
use booking_engine::resource::{
    Reservation, ReservationState, Resource, ResourceConfig,
};
use booking_engine::slot::generate_slots;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 11, 0, 0, 0).unwrap()
}

fn arb_slot_size() -> impl Strategy<Value = i64> {
    prop_oneof![Just(15i64), Just(30), Just(45), Just(60), Just(90)]
}

fn arb_slot_count() -> impl Strategy<Value = i64> {
    1i64..=40
}

fn arb_cooldown() -> impl Strategy<Value = i64> {
    0i64..=90
}

/// Reservations as (offset, length) minute pairs inside a day-sized window.
fn arb_reservations() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((0i64..=1380, 15i64..=180), 0..6)
}

fn reservations_from(pairs: &[(i64, i64)]) -> Vec<Reservation> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, &(offset, length))| Reservation {
            id: i as u64 + 1,
            resource: "studio-b".to_string(),
            begin: base() + Duration::minutes(offset),
            end: base() + Duration::minutes(offset + length),
            state: ReservationState::Confirmed,
            is_own: false,
        })
        .collect()
}

fn overnight_resource() -> Resource {
    Resource {
        id: "cabin-3".to_string(),
        opening_hours: vec![],
        reservations: Some(vec![]),
        config: ResourceConfig {
            slot_size_minutes: 30,
            min_period_minutes: 20 * 60,
            max_period_minutes: None,
            cooldown_minutes: 0,
            reservable_after: None,
            reservable_before: None,
            reservable: true,
            overnight_start_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            overnight_end_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
        },
    }
}

fn arb_day() -> impl Strategy<Value = NaiveDate> {
    (0i64..=365).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2026, 7, 1).unwrap() + Duration::days(offset)
    })
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: Slots partition the window — no gaps, no overlap, full count
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_partition_the_window(
        size in arb_slot_size(),
        count in arb_slot_count(),
        remainder in 0i64..=14,
        pairs in arb_reservations(),
    ) {
        let window_start = base();
        let window_end = window_start + Duration::minutes(size * count + remainder);
        let reservations = reservations_from(&pairs);

        let slots = generate_slots(
            Some(window_start),
            Some(window_end),
            size,
            &reservations,
            &[],
            0,
        );

        prop_assert_eq!(slots.len() as i64, count);
        prop_assert_eq!(slots[0].start, window_start);
        for window in slots.windows(2) {
            prop_assert_eq!(window[0].end, window[1].start);
        }
        let last = &slots[slots.len() - 1];
        prop_assert_eq!(last.end, window_start + Duration::minutes(size * count));
    }
}

// ---------------------------------------------------------------------------
// Property 2: A slot is never both reserved and on cooldown
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn reserved_and_cooldown_never_coincide(
        size in arb_slot_size(),
        count in arb_slot_count(),
        cooldown in arb_cooldown(),
        pairs in arb_reservations(),
    ) {
        let window_start = base();
        let window_end = window_start + Duration::minutes(size * count);
        let reservations = reservations_from(&pairs);

        let slots = generate_slots(
            Some(window_start),
            Some(window_end),
            size,
            &reservations,
            &[],
            cooldown,
        );

        for slot in &slots {
            prop_assert!(
                !(slot.reserved && slot.on_cooldown),
                "slot at {:?} is both reserved and on cooldown",
                slot.start
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Cooldown only ever appears next to a reservation
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn cooldown_slots_always_name_a_contributor(
        size in arb_slot_size(),
        count in arb_slot_count(),
        cooldown in arb_cooldown(),
        pairs in arb_reservations(),
    ) {
        let window_start = base();
        let window_end = window_start + Duration::minutes(size * count);
        let reservations = reservations_from(&pairs);

        let slots = generate_slots(
            Some(window_start),
            Some(window_end),
            size,
            &reservations,
            &[],
            cooldown,
        );

        for slot in &slots {
            if slot.on_cooldown {
                prop_assert!(!slot.reservations.is_empty());
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Generation is deterministic — identical inputs, identical output
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn generation_is_deterministic(
        size in arb_slot_size(),
        count in arb_slot_count(),
        cooldown in arb_cooldown(),
        pairs in arb_reservations(),
    ) {
        let window_start = base();
        let window_end = window_start + Duration::minutes(size * count);
        let reservations = reservations_from(&pairs);

        let first = generate_slots(
            Some(window_start),
            Some(window_end),
            size,
            &reservations,
            &[],
            cooldown,
        );
        let second = generate_slots(
            Some(window_start),
            Some(window_end),
            size,
            &reservations,
            &[],
            cooldown,
        );
        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// Property 5: Free-time answers are idempotent for a fixed "now"
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn free_time_answer_is_idempotent(
        size in arb_slot_size(),
        count in 1i64..=20,
        min_period in prop_oneof![Just(30i64), Just(60), Just(120)],
        cooldown in arb_cooldown(),
        pairs in arb_reservations(),
    ) {
        let opens = base() + Duration::hours(8);
        let closes = opens + Duration::minutes(size * count);
        let reservations = reservations_from(&pairs);
        let now = base() + Duration::hours(9);

        let first = has_free_time_in_day(
            Some(opens), Some(closes), &reservations, min_period, size, cooldown, now,
        );
        let second = has_free_time_in_day(
            Some(opens), Some(closes), &reservations, min_period, size, cooldown, now,
        );
        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// Property 6: Selection state machine laws
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn clicking_the_same_day_twice_returns_to_empty(day in arb_day()) {
        let resource = overnight_resource();
        let engine = OvernightAvailability::new(
            &resource,
            Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
            false,
        ).unwrap();

        let selection = engine.handle_date_select(RangeSelection::Empty, day);
        let selection = engine.handle_date_select(selection, day);
        prop_assert_eq!(selection, RangeSelection::Empty);
    }

    #[test]
    fn any_click_after_completion_restarts(
        a in arb_day(),
        b in arb_day(),
        c in arb_day(),
    ) {
        prop_assume!(b > a);
        let resource = overnight_resource();
        let engine = OvernightAvailability::new(
            &resource,
            Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
            false,
        ).unwrap();

        let selection = engine.handle_date_select(RangeSelection::Empty, a);
        let selection = engine.handle_date_select(selection, b);
        prop_assert!(selection.is_complete());

        let selection = engine.handle_date_select(selection, c);
        match selection {
            RangeSelection::PartialRange { start } => {
                prop_assert_eq!(start.date_naive(), c);
            }
            other => prop_assert!(false, "expected a restarted range, got {:?}", other),
        }
    }

    #[test]
    fn completed_ranges_are_ordered(a in arb_day(), b in arb_day()) {
        prop_assume!(a != b);
        let resource = overnight_resource();
        let engine = OvernightAvailability::new(
            &resource,
            Utc.with_ymd_and_hms(2026, 6, 1, 9, 0, 0).unwrap(),
            false,
        ).unwrap();

        let selection = engine.handle_date_select(RangeSelection::Empty, a);
        let selection = engine.handle_date_select(selection, b);
        if let RangeSelection::CompleteRange { start, end } = selection {
            prop_assert!(start < end);
            prop_assert!(start.date_naive() <= end.date_naive());
        }
    }
}
