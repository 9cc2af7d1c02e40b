//! Weekly availability templates and their resolution to concrete instants.

use chrono::{Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interval::{merge_intervals, Interval};
use crate::time::{local_to_utc, LocalTime};

/// A wall-clock range `[start, end)` within one host-local day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalRange {
    pub start: LocalTime,
    pub end: LocalTime,
}

impl LocalRange {
    pub fn new(start: LocalTime, end: LocalTime) -> Self {
        Self { start, end }
    }

    /// Convenience constructor from `"HH:MM"` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Ok(Self {
            start: LocalTime::parse(start)?,
            end: LocalTime::parse(end)?,
        })
    }

    pub fn is_valid(&self) -> bool {
        self.start < self.end
    }
}

/// Open ranges per weekday. A day with no ranges has no availability.
///
/// Ranges within a day may be unsorted or overlapping; resolution takes their
/// union.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklySchedule {
    pub monday: Vec<LocalRange>,
    pub tuesday: Vec<LocalRange>,
    pub wednesday: Vec<LocalRange>,
    pub thursday: Vec<LocalRange>,
    pub friday: Vec<LocalRange>,
    pub saturday: Vec<LocalRange>,
    pub sunday: Vec<LocalRange>,
}

impl WeeklySchedule {
    pub fn ranges(&self, day: Weekday) -> &[LocalRange] {
        match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    pub fn ranges_mut(&mut self, day: Weekday) -> &mut Vec<LocalRange> {
        match day {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }

    /// Builder-style helper: append a range to `day`.
    pub fn with(mut self, day: Weekday, range: LocalRange) -> Self {
        self.ranges_mut(day).push(range);
        self
    }

    /// Iterate `(weekday, range)` pairs, Monday first.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &LocalRange)> {
        WEEK.iter()
            .flat_map(move |&day| self.ranges(day).iter().map(move |r| (day, r)))
    }
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Resolve the open ranges of `date` to absolute instants in the host zone.
///
/// Overlapping ranges are merged into their union and the result is sorted.
/// Ranges with `start >= end` contribute nothing.
pub fn open_ranges(schedule: &WeeklySchedule, date: NaiveDate, tz: Tz) -> Result<Vec<Interval>> {
    let mut materialized = Vec::new();
    for range in schedule.ranges(date.weekday()) {
        if !range.is_valid() {
            continue;
        }
        let start = local_to_utc(tz, date, range.start)?;
        let end = local_to_utc(tz, date, range.end)?;
        materialized.push(Interval::normalized(start, end));
    }
    Ok(merge_intervals(materialized))
}
