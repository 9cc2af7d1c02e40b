//! Candidate slot generation: subtract, discretize, filter.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::busy::BusyInterval;
use crate::interval::{subtract_intervals, Interval};

/// A bookable `[start, start + duration)` pair of absolute instants.
///
/// Computed per calculation and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CandidateSlot {
    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }
}

/// The event type knobs the generator needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotParams {
    pub duration_minutes: u32,
    pub slot_interval_minutes: u32,
    pub min_notice_minutes: u32,
    pub max_bookings_per_day: Option<u32>,
}

/// Produce the chronologically ordered candidate slots of one day.
///
/// `open` must be sorted and disjoint (as returned by
/// [`crate::schedule::open_ranges`]) and `busy` coalesced (as returned by
/// [`crate::busy::aggregate_busy`]). When `slot_interval_minutes` is smaller than
/// `duration_minutes` consecutive slots overlap each other; they never overlap
/// `busy`.
pub fn generate_slots(
    open: &[Interval],
    busy: &[BusyInterval],
    params: &SlotParams,
    now: DateTime<Utc>,
    confirmed_today: usize,
) -> Vec<CandidateSlot> {
    if let Some(cap) = params.max_bookings_per_day {
        if confirmed_today >= cap as usize {
            return Vec::new();
        }
    }
    if params.duration_minutes == 0 || params.slot_interval_minutes == 0 {
        return Vec::new();
    }

    let duration = Duration::minutes(i64::from(params.duration_minutes));
    let step = Duration::minutes(i64::from(params.slot_interval_minutes));
    let earliest = now + Duration::minutes(i64::from(params.min_notice_minutes));
    let busy: Vec<Interval> = busy.iter().map(BusyInterval::interval).collect();

    let mut slots = Vec::new();
    for range in open {
        for free in subtract_intervals(*range, &busy) {
            let mut start = free.start;
            while start + duration <= free.end {
                if start >= earliest {
                    slots.push(CandidateSlot {
                        start,
                        end: start + duration,
                    });
                }
                start += step;
            }
        }
    }

    slots
}
