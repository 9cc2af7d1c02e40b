//! Property-based tests for slot calculation using proptest.
//!
//! These hold for any schedule, booking set and buffer configuration, not just
//! the scenarios in `engine_tests.rs`.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc, Weekday};
use proptest::prelude::*;
use slot_engine::busy::{aggregate_busy, Buffers};
use slot_engine::engine::{calculate, candidate_slots, SlotRequest};
use slot_engine::schedule::open_ranges;
use slot_engine::time::parse_timezone;
use slot_engine::{EventTypeConfig, Interval, LocalRange, LocalTime, RangePolicy, WeeklySchedule};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_timezone() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("UTC".to_string()),
        Just("America/New_York".to_string()),
        Just("Europe/London".to_string()),
        Just("Asia/Kolkata".to_string()),
        Just("Australia/Sydney".to_string()),
    ]
}

/// A local range on a 5-minute grid, start strictly before end.
fn arb_range() -> impl Strategy<Value = LocalRange> {
    (0u16..288, 1u16..=96).prop_map(|(start, len)| {
        let start_min = start * 5;
        let end_min = (start_min + len * 5).min(24 * 60);
        LocalRange::new(
            LocalTime::from_hm(start_min / 60, start_min % 60).unwrap(),
            LocalTime::from_hm(end_min / 60, end_min % 60).unwrap(),
        )
    })
}

/// Bookings as (minutes after 00:00 UTC of the target date, length) pairs.
fn arb_bookings() -> impl Strategy<Value = Vec<(i64, i64)>> {
    prop::collection::vec((-120i64..1560, 5i64..180), 0..6)
}

fn arb_config() -> impl Strategy<Value = EventTypeConfig> {
    (
        arb_timezone(),
        prop::collection::vec(arb_range(), 0..4),
        prop_oneof![Just(15u32), Just(30), Just(45), Just(60)],
        prop_oneof![Just(5u32), Just(10), Just(15), Just(30)],
        0u32..=30,
        0u32..=30,
    )
        .prop_map(|(tz, ranges, duration, step, before, after)| {
            let mut et = EventTypeConfig::new("prop", "host", duration, tz);
            for r in ranges {
                et.weekly_schedule.ranges_mut(Weekday::Wed).push(r);
            }
            et.slot_interval_minutes = Some(step);
            et.buffer_before_minutes = before;
            et.buffer_after_minutes = after;
            et.range = RangePolicy::Indefinite;
            et
        })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

// 2026-03-18 is a Wednesday.
fn target() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 18).unwrap()
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap()
}

fn bookings(raw: &[(i64, i64)]) -> Vec<Interval> {
    let base = Utc.with_ymd_and_hms(2026, 3, 18, 0, 0, 0).unwrap();
    raw.iter()
        .map(|&(offset, len)| {
            let start = base + Duration::minutes(offset);
            Interval::new(start, start + Duration::minutes(len))
        })
        .collect()
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

fn request<'a>(et: &'a EventTypeConfig, booked: &'a [Interval]) -> SlotRequest<'a> {
    SlotRequest {
        event_type: et,
        date: target(),
        requester_timezone: "UTC",
        now: now(),
        bookings: booked,
        external_busy: None,
    }
}

// ---------------------------------------------------------------------------
// Property 1: No slot overlaps a buffered booking
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_never_overlap_buffered_bookings(et in arb_config(), raw in arb_bookings()) {
        let booked = bookings(&raw);
        let slots = candidate_slots(&request(&et, &booked)).unwrap();

        let before = Duration::minutes(i64::from(et.buffer_before_minutes));
        let after = Duration::minutes(i64::from(et.buffer_after_minutes));
        for slot in &slots {
            for b in &booked {
                let obstruction = b.widened(before, after);
                prop_assert!(
                    !slot.interval().overlaps(&obstruction),
                    "slot {:?} overlaps obstruction {:?}",
                    slot,
                    obstruction
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 2: Slots are chronological, full length and inside open ranges
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn slots_are_sorted_sized_and_contained(et in arb_config(), raw in arb_bookings()) {
        let booked = bookings(&raw);
        let slots = candidate_slots(&request(&et, &booked)).unwrap();
        let tz = parse_timezone(&et.host_timezone).unwrap();
        let open = open_ranges(&et.weekly_schedule, target(), tz).unwrap();

        for pair in slots.windows(2) {
            prop_assert!(pair[0].start < pair[1].start);
        }
        for slot in &slots {
            prop_assert_eq!(
                slot.end - slot.start,
                Duration::minutes(i64::from(et.duration_minutes))
            );
            prop_assert!(
                open.iter().any(|r| r.start <= slot.start && slot.end <= r.end),
                "slot {:?} outside open ranges {:?}",
                slot,
                open
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: Merged busy set is sorted and has no touching neighbours
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn busy_set_is_coalesced(raw in arb_bookings(), ext in arb_bookings(), before in 0u32..60, after in 0u32..60) {
        let external = bookings(&ext);
        let busy = aggregate_busy(
            &bookings(&raw),
            Some(&external),
            Buffers { before_minutes: before, after_minutes: after },
        );

        for pair in busy.windows(2) {
            prop_assert!(pair[0].end < pair[1].start);
        }
        for b in &busy {
            prop_assert!(b.start < b.end);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: Calculation is idempotent
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn calculation_is_idempotent(et in arb_config(), raw in arb_bookings(), tz in arb_timezone()) {
        let booked = bookings(&raw);
        let req = SlotRequest { requester_timezone: &tz, ..request(&et, &booked) };

        prop_assert_eq!(calculate(&req).unwrap(), calculate(&req).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Property 5: Rendering preserves count and order
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn rendering_preserves_slots(et in arb_config(), tz in arb_timezone()) {
        let slots = candidate_slots(&request(&et, &[])).unwrap();
        let req = SlotRequest { requester_timezone: &tz, ..request(&et, &[]) };
        let rendered = calculate(&req).unwrap();

        prop_assert_eq!(rendered.count, slots.len());
        for (display, slot) in rendered.slots.iter().zip(&slots) {
            let parsed = DateTime::parse_from_rfc3339(&display.start).unwrap();
            prop_assert_eq!(parsed.with_timezone(&Utc), slot.start);
        }
    }
}

#[test]
fn empty_schedule_has_no_slots() {
    let et = EventTypeConfig::new("empty", "host", 30, "UTC");
    assert!(candidate_slots(&request(&et, &[])).unwrap().is_empty());
    assert_eq!(WeeklySchedule::default().iter().count(), 0);
}
