//! Tests for interval merging and subtraction.

use chrono::{DateTime, TimeZone, Utc};
use slot_engine::interval::{merge_intervals, subtract_intervals};
use slot_engine::Interval;

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
}

fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> Interval {
    Interval::new(at(sh, sm), at(eh, em))
}

#[test]
fn touching_intervals_merge() {
    let merged = merge_intervals([iv(10, 0, 11, 0), iv(11, 0, 12, 0)]);
    assert_eq!(merged, vec![iv(10, 0, 12, 0)]);
}

#[test]
fn unsorted_overlaps_coalesce() {
    let merged = merge_intervals([iv(14, 0, 15, 0), iv(9, 0, 10, 30), iv(10, 0, 10, 15)]);
    assert_eq!(merged, vec![iv(9, 0, 10, 30), iv(14, 0, 15, 0)]);
}

#[test]
fn subtraction_splits_truncates_and_eliminates() {
    let range = iv(9, 0, 12, 0);
    assert_eq!(
        subtract_intervals(range, &[iv(10, 0, 10, 30)]),
        vec![iv(9, 0, 10, 0), iv(10, 30, 12, 0)]
    );
    assert_eq!(
        subtract_intervals(range, &[iv(8, 0, 9, 30), iv(11, 45, 13, 0)]),
        vec![iv(9, 30, 11, 45)]
    );
    assert!(subtract_intervals(range, &[iv(8, 0, 13, 0)]).is_empty());
}

#[test]
fn busy_outside_range_is_ignored() {
    let range = iv(13, 0, 17, 0);
    assert_eq!(
        subtract_intervals(range, &[iv(9, 0, 12, 0), iv(17, 0, 18, 0)]),
        vec![range]
    );
}
