//! Busy interval aggregation across internal bookings and an external calendar.
//!
//! Internal bookings are widened by the host's buffers; external busy periods
//! are taken as reported. Everything is merged into one sorted, coalesced set.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Where a busy interval came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BusySource {
    InternalBooking,
    ExternalCalendar,
    /// A merged interval built from both sources.
    Mixed,
}

impl BusySource {
    fn combine(self, other: BusySource) -> BusySource {
        if self == other {
            self
        } else {
            BusySource::Mixed
        }
    }
}

/// A half-open busy range `[start, end)` tagged with its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub source: BusySource,
}

impl BusyInterval {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// Padding reserved around every existing booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Buffers {
    pub before_minutes: u32,
    pub after_minutes: u32,
}

/// Merge bookings and external busy periods into one coalesced busy set.
///
/// Each booking becomes `[start - before, end + after)`. External intervals get
/// no buffer. Intervals that overlap or touch are merged. Negative-duration
/// inputs are clamped to zero length and then dropped.
pub fn aggregate_busy(
    bookings: &[Interval],
    external: Option<&[Interval]>,
    buffers: Buffers,
) -> Vec<BusyInterval> {
    let before = Duration::minutes(i64::from(buffers.before_minutes));
    let after = Duration::minutes(i64::from(buffers.after_minutes));

    let internal = bookings.iter().map(|b| {
        let widened = Interval::normalized(b.start, b.end).widened(before, after);
        (widened, BusySource::InternalBooking)
    });
    let external = external
        .unwrap_or_default()
        .iter()
        .map(|e| (Interval::normalized(e.start, e.end), BusySource::ExternalCalendar));

    let mut tagged: Vec<(Interval, BusySource)> = internal
        .chain(external)
        .filter(|(i, _)| !i.is_empty())
        .collect();
    tagged.sort_by_key(|(i, _)| (i.start, i.end));

    let mut merged: Vec<BusyInterval> = Vec::with_capacity(tagged.len());
    for (interval, source) in tagged {
        if let Some(last) = merged.last_mut() {
            if interval.start <= last.end {
                last.end = last.end.max(interval.end);
                last.source = last.source.combine(source);
                continue;
            }
        }
        merged.push(BusyInterval {
            start: interval.start,
            end: interval.end,
            source,
        });
    }

    merged
}
