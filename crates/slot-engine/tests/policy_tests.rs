//! Tests for booking-window policies.

use chrono::NaiveDate;
use slot_engine::{EventTypeConfig, RangePolicy, SlotError};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn rolling_window_is_inclusive() {
    let today = d(2026, 3, 16);
    let policy = RangePolicy::Rolling { range_days: 7 };
    assert!(policy.is_bookable(today, today));
    assert!(policy.is_bookable(today, d(2026, 3, 23)));
    assert!(!policy.is_bookable(today, d(2026, 3, 24)));
}

#[test]
fn past_dates_never_bookable() {
    let today = d(2026, 3, 16);
    let yesterday = d(2026, 3, 15);
    for policy in [
        RangePolicy::Rolling { range_days: 30 },
        RangePolicy::Range {
            range_start: d(2026, 3, 1),
            range_end: d(2026, 3, 31),
        },
        RangePolicy::Indefinite,
    ] {
        assert!(!policy.is_bookable(today, yesterday), "{policy:?}");
    }
}

#[test]
fn inverted_range_admits_nothing() {
    let policy = RangePolicy::Range {
        range_start: d(2026, 4, 1),
        range_end: d(2026, 3, 1),
    };
    assert!(!policy.is_bookable(d(2026, 3, 1), d(2026, 3, 15)));
    assert!(matches!(policy.validate(), Err(SlotError::Configuration(_))));
}

#[test]
fn deserializes_from_tagged_json() {
    let policy: RangePolicy =
        serde_json::from_str(r#"{"range_type":"rolling","range_days":14}"#).unwrap();
    assert_eq!(policy, RangePolicy::Rolling { range_days: 14 });
    let policy: RangePolicy = serde_json::from_str(r#"{"range_type":"indefinite"}"#).unwrap();
    assert_eq!(policy, RangePolicy::Indefinite);
}

#[test]
fn event_type_json_requires_range_type() {
    let without = r#"{"id":"x","host_id":"h","duration_minutes":30,"host_timezone":"UTC"}"#;
    assert!(serde_json::from_str::<EventTypeConfig>(without).is_err());

    let with = r#"{"id":"x","host_id":"h","duration_minutes":30,"host_timezone":"UTC","range_type":"indefinite"}"#;
    let et: EventTypeConfig = serde_json::from_str(with).unwrap();
    assert_eq!(et.range, RangePolicy::Indefinite);
}

#[test]
fn constructor_uses_documented_rolling_window() {
    let et = EventTypeConfig::new("x", "h", 30, "UTC");
    assert_eq!(
        et.range,
        RangePolicy::Rolling {
            range_days: slot_engine::event_type::DEFAULT_ROLLING_DAYS
        }
    );
}
