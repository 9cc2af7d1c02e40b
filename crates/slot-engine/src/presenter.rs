//! Rendering of candidate slots in the requester's timezone.

use chrono::SecondsFormat;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::generator::CandidateSlot;

/// Wall-clock format used for `start_display` / `end_display`.
const DISPLAY_FORMAT: &str = "%H:%M";

/// A slot rendered in the requester's zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDisplay {
    /// RFC 3339 start with the requester's UTC offset.
    pub start: String,
    /// RFC 3339 end with the requester's UTC offset.
    pub end: String,
    /// Local start time, `HH:MM`.
    pub start_display: String,
    /// Local end time, `HH:MM`.
    pub end_display: String,
}

/// Render slots in `tz`. Order and membership are preserved.
pub fn present_slots(slots: &[CandidateSlot], tz: Tz) -> Vec<SlotDisplay> {
    slots
        .iter()
        .map(|slot| {
            let start = slot.start.with_timezone(&tz);
            let end = slot.end.with_timezone(&tz);
            SlotDisplay {
                start: start.to_rfc3339_opts(SecondsFormat::Secs, false),
                end: end.to_rfc3339_opts(SecondsFormat::Secs, false),
                start_display: start.format(DISPLAY_FORMAT).to_string(),
                end_display: end.format(DISPLAY_FORMAT).to_string(),
            }
        })
        .collect()
}
