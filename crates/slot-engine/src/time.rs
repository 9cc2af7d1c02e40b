//! Timezone-aware conversion between host-local wall-clock values and absolute
//! instants.
//!
//! All schedule arithmetic happens in the host's zone through these helpers.
//! DST handling is fixed: an ambiguous wall-clock time (fall-back overlap)
//! resolves to its earlier instant, and a wall-clock time inside a
//! spring-forward gap resolves to the first valid instant after the gap.

use std::fmt;

use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::interval::Interval;

/// Minutes in one wall-clock day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Parse an IANA timezone identifier (e.g. `"America/New_York"`).
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse()
        .map_err(|_| SlotError::InvalidTimezone(name.to_string()))
}

/// A wall-clock time of day with minute precision.
///
/// Serialized as `"HH:MM"`. `"24:00"` is accepted and denotes the end of the
/// day, so a range can run up to midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocalTime(u16);

impl LocalTime {
    pub const MIDNIGHT: LocalTime = LocalTime(0);
    pub const END_OF_DAY: LocalTime = LocalTime(MINUTES_PER_DAY);

    /// Build from hour and minute. `24:00` is the only valid value with hour 24.
    pub fn from_hm(hour: u16, minute: u16) -> Result<Self> {
        let valid = minute < 60 && (hour < 24 || (hour == 24 && minute == 0));
        if !valid {
            return Err(SlotError::InvalidTime(format!("{:02}:{:02}", hour, minute)));
        }
        Ok(LocalTime(hour * 60 + minute))
    }

    /// Parse `"HH:MM"` (a single-digit hour such as `"9:00"` is also accepted).
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || SlotError::InvalidTime(s.to_string());
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        if h.is_empty() || h.len() > 2 || m.len() != 2 {
            return Err(invalid());
        }
        let hour: u16 = h.parse().map_err(|_| invalid())?;
        let minute: u16 = m.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).map_err(|_| invalid())
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    pub fn is_end_of_day(self) -> bool {
        self.0 == MINUTES_PER_DAY
    }
}

impl fmt::Display for LocalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl TryFrom<String> for LocalTime {
    type Error = SlotError;

    fn try_from(value: String) -> Result<Self> {
        LocalTime::parse(&value)
    }
}

impl From<LocalTime> for String {
    fn from(value: LocalTime) -> Self {
        value.to_string()
    }
}

/// Materialize a wall-clock time on `date` in `tz` as an absolute instant.
///
/// `24:00` maps to midnight at the start of the following day.
pub fn local_to_utc(tz: Tz, date: NaiveDate, time: LocalTime) -> Result<DateTime<Utc>> {
    let (date, minutes) = if time.is_end_of_day() {
        let next = date
            .checked_add_days(Days::new(1))
            .ok_or_else(|| SlotError::InvalidTime(format!("{} 24:00", date)))?;
        (next, 0)
    } else {
        (date, time.minutes())
    };
    let naive_time = NaiveTime::from_hms_opt(u32::from(minutes / 60), u32::from(minutes % 60), 0)
        .ok_or_else(|| SlotError::InvalidTime(time.to_string()))?;
    resolve_local(tz, date.and_time(naive_time))
}

/// Resolve a naive wall-clock datetime in `tz`, applying the DST policy.
///
/// # Errors
/// Returns `SlotError::InvalidTime` if no valid instant follows a gap within
/// one day.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            // Walk forward to the end of the gap. Gaps are whole minutes and
            // never longer than a day.
            let mut candidate = naive;
            for _ in 0..MINUTES_PER_DAY {
                candidate += chrono::Duration::minutes(1);
                if let Some(dt) = tz.from_local_datetime(&candidate).earliest() {
                    return Ok(dt.with_timezone(&Utc));
                }
            }
            Err(SlotError::InvalidTime(format!("{} in {}", naive, tz.name())))
        }
    }
}

/// The host-local calendar date containing `now`.
pub fn host_today(tz: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

/// Absolute bounds `[start, next day's start)` of the host-local calendar day.
///
/// The interval is 23 or 25 hours long on DST transition days.
pub fn local_day_bounds(tz: Tz, date: NaiveDate) -> Result<Interval> {
    let start = local_to_utc(tz, date, LocalTime::MIDNIGHT)?;
    let end = local_to_utc(tz, date, LocalTime::END_OF_DAY)?;
    Ok(Interval::new(start, end))
}

