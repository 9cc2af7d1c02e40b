//! Half-open instant ranges and the interval algebra the engine is built on.
//!
//! [`merge_intervals`] sorts and coalesces; [`subtract_intervals`] walks a
//! coalesced busy set with a cursor to produce the free gaps of a range.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A half-open range `[start, end)` of absolute instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// An interval with `end < start` is normalized to zero length at `start`.
    pub fn normalized(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Two intervals overlap iff `a.start < b.end && b.start < a.end`.
    /// Intervals that only touch do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Widen by `before` at the start and `after` at the end.
    pub fn widened(&self, before: Duration, after: Duration) -> Self {
        Self {
            start: self.start - before,
            end: self.end + after,
        }
    }
}

/// Sort and coalesce intervals.
///
/// Returns a sorted list in which no two intervals overlap or touch. Empty
/// intervals are dropped.
pub fn merge_intervals(intervals: impl IntoIterator<Item = Interval>) -> Vec<Interval> {
    let mut sorted: Vec<Interval> = intervals.into_iter().filter(|i| !i.is_empty()).collect();

    // Sort by start time (then by end time for stability).
    sorted.sort_by_key(|i| (i.start, i.end));

    let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                // Overlapping or adjacent, extend the current interval.
                last.end = last.end.max(interval.end);
                continue;
            }
        }
        merged.push(interval);
    }

    merged
}

/// Subtract a sorted, coalesced busy set from `range`.
///
/// A busy interval inside the range splits it, one crossing an edge truncates
/// it, and one covering it removes it. Returned gaps are sorted and non-empty.
pub fn subtract_intervals(range: Interval, busy: &[Interval]) -> Vec<Interval> {
    let mut free = Vec::new();
    let mut cursor = range.start;

    for b in busy.iter().filter(|b| b.overlaps(&range)) {
        if cursor < b.start {
            free.push(Interval::new(cursor, b.start));
        }
        cursor = cursor.max(b.end);
        if cursor >= range.end {
            break;
        }
    }

    // Trailing free gap after the last busy interval.
    if cursor < range.end {
        free.push(Interval::new(cursor, range.end));
    }

    free
}

