//! Host-defined event type configuration.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::busy::Buffers;
use crate::error::{Result, SlotError};
use crate::generator::SlotParams;
use crate::policy::RangePolicy;
use crate::schedule::WeeklySchedule;
use crate::time::parse_timezone;

/// Shortest bookable meeting.
pub const MIN_DURATION_MINUTES: u32 = 5;

/// Rolling window used by [`EventTypeConfig::new`].
pub const DEFAULT_ROLLING_DAYS: u32 = 60;

/// A bookable meeting template. Immutable for the duration of one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTypeConfig {
    pub id: String,
    pub host_id: String,
    /// Inactive event types are reported as not found by providers.
    #[serde(default = "default_active")]
    pub active: bool,
    pub duration_minutes: u32,
    #[serde(default)]
    pub weekly_schedule: WeeklySchedule,
    #[serde(default)]
    pub buffer_before_minutes: u32,
    #[serde(default)]
    pub buffer_after_minutes: u32,
    #[serde(default)]
    pub min_notice_minutes: u32,
    /// Step between candidate starts. Defaults to `duration_minutes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_interval_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bookings_per_day: Option<u32>,
    /// Flattened; `range_type` must be present in serialized form.
    #[serde(flatten)]
    pub range: RangePolicy,
    /// IANA zone in which every wall-clock field is interpreted.
    pub host_timezone: String,
}

fn default_active() -> bool {
    true
}

impl EventTypeConfig {
    /// A config with an empty schedule, no buffers and a rolling window of
    /// [`DEFAULT_ROLLING_DAYS`].
    pub fn new(
        id: impl Into<String>,
        host_id: impl Into<String>,
        duration_minutes: u32,
        host_timezone: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            host_id: host_id.into(),
            active: true,
            duration_minutes,
            weekly_schedule: WeeklySchedule::default(),
            buffer_before_minutes: 0,
            buffer_after_minutes: 0,
            min_notice_minutes: 0,
            slot_interval_minutes: None,
            max_bookings_per_day: None,
            range: RangePolicy::Rolling {
                range_days: DEFAULT_ROLLING_DAYS,
            },
            host_timezone: host_timezone.into(),
        }
    }

    pub fn slot_interval(&self) -> u32 {
        self.slot_interval_minutes.unwrap_or(self.duration_minutes)
    }

    pub fn buffers(&self) -> Buffers {
        Buffers {
            before_minutes: self.buffer_before_minutes,
            after_minutes: self.buffer_after_minutes,
        }
    }

    pub fn slot_params(&self) -> SlotParams {
        SlotParams {
            duration_minutes: self.duration_minutes,
            slot_interval_minutes: self.slot_interval(),
            min_notice_minutes: self.min_notice_minutes,
            max_bookings_per_day: self.max_bookings_per_day,
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        parse_timezone(&self.host_timezone)
    }

    /// Every configuration problem, in field order. Empty when valid.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.duration_minutes < MIN_DURATION_MINUTES {
            problems.push(format!(
                "duration_minutes must be at least {}, got {}",
                MIN_DURATION_MINUTES, self.duration_minutes
            ));
        }
        for (day, range) in self.weekly_schedule.iter() {
            if !range.is_valid() {
                problems.push(format!(
                    "{:?} range {}-{} does not start before it ends",
                    day, range.start, range.end
                ));
            }
        }
        if self.slot_interval_minutes == Some(0) {
            problems.push("slot_interval_minutes must be positive".to_string());
        }
        if self.max_bookings_per_day == Some(0) {
            problems.push("max_bookings_per_day must be positive when set".to_string());
        }
        if let Err(SlotError::Configuration(msg)) = self.range.validate() {
            problems.push(msg);
        }
        if let Err(e) = self.timezone() {
            problems.push(e.to_string());
        }

        problems
    }

    pub fn validate(&self) -> Result<()> {
        let problems = self.problems();
        if problems.is_empty() {
            Ok(())
        } else {
            Err(SlotError::Configuration(problems.join("; ")))
        }
    }
}
