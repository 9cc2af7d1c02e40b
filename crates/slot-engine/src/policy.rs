//! Booking-window policies: which calendar dates may be booked at all.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

/// How far into the future an event type may be booked.
///
/// Serialized with a `range_type` tag: `{"range_type": "rolling", "range_days": 30}`.
/// The tag is required; there is no implicit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "range_type", rename_all = "snake_case")]
pub enum RangePolicy {
    /// Bookable from today through `today + range_days`, inclusive.
    Rolling { range_days: u32 },
    /// Bookable only between the two dates, inclusive.
    Range {
        range_start: NaiveDate,
        range_end: NaiveDate,
    },
    /// No upper bound.
    Indefinite,
}

impl RangePolicy {
    /// Decide whether `target` is bookable when the host-local date is `today`.
    ///
    /// A date before `today` is never bookable, and an inverted fixed range
    /// admits no date.
    pub fn is_bookable(&self, today: NaiveDate, target: NaiveDate) -> bool {
        if target < today {
            return false;
        }
        match *self {
            RangePolicy::Rolling { range_days } => today
                .checked_add_days(Days::new(u64::from(range_days)))
                .is_none_or(|last| target <= last),
            RangePolicy::Range {
                range_start,
                range_end,
            } => range_start <= target && target <= range_end,
            RangePolicy::Indefinite => true,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            RangePolicy::Range {
                range_start,
                range_end,
            } if range_start > range_end => Err(SlotError::Configuration(format!(
                "range_start {} is after range_end {}",
                range_start, range_end
            ))),
            _ => Ok(()),
        }
    }
}

