//! The pure calculation stage.
//!
//! Gate the date, resolve open ranges, aggregate obstructions, generate and
//! render slots. No I/O happens here: every input, including "now", is passed
//! in, so identical requests always produce identical output.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::busy::aggregate_busy;
use crate::error::{Result, SlotError};
use crate::event_type::EventTypeConfig;
use crate::generator::{generate_slots, CandidateSlot};
use crate::interval::Interval;
use crate::presenter::{present_slots, SlotDisplay};
use crate::schedule::open_ranges;
use crate::time::{host_today, local_day_bounds, parse_timezone};

/// Everything one calculation needs, already fetched.
#[derive(Debug, Clone, Copy)]
pub struct SlotRequest<'a> {
    pub event_type: &'a EventTypeConfig,
    /// Target date, host-local.
    pub date: NaiveDate,
    /// IANA zone the slots are rendered in.
    pub requester_timezone: &'a str,
    pub now: DateTime<Utc>,
    /// Confirmed bookings of the host that may obstruct `date`, including ones
    /// starting on a neighbouring day. Only bookings starting on `date` count
    /// toward `max_bookings_per_day`.
    pub bookings: &'a [Interval],
    /// External busy periods, or `None` when they were not checked.
    pub external_busy: Option<&'a [Interval]>,
}

/// Bookable slots of one event type on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub event_type_id: String,
    pub date: NaiveDate,
    pub timezone: String,
    pub slots: Vec<SlotDisplay>,
    pub count: usize,
    /// Whether external calendar data was part of the calculation.
    pub external_checked: bool,
    /// Set when the event type is misconfigured; `slots` is then empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_error: Option<String>,
}

/// Compute the candidate slots of a request as absolute instants.
///
/// # Errors
/// Returns `SlotError::Configuration` if the event type is invalid, including an
/// unknown host timezone.
pub fn candidate_slots(request: &SlotRequest<'_>) -> Result<Vec<CandidateSlot>> {
    let config = request.event_type;
    config.validate()?;
    let tz = config
        .timezone()
        .map_err(|e| SlotError::Configuration(e.to_string()))?;

    let today = host_today(tz, request.now);
    if !config.range.is_bookable(today, request.date) {
        debug!(event_type = %config.id, date = %request.date, %today, "date outside booking window");
        return Ok(Vec::new());
    }

    let day = local_day_bounds(tz, request.date)?;
    let booked_today = request
        .bookings
        .iter()
        .filter(|b| day.start <= b.start && b.start < day.end)
        .count();

    let open = open_ranges(&config.weekly_schedule, request.date, tz)?;
    let busy = aggregate_busy(request.bookings, request.external_busy, config.buffers());
    let slots = generate_slots(&open, &busy, &config.slot_params(), request.now, booked_today);

    debug!(
        event_type = %config.id,
        date = %request.date,
        open_ranges = open.len(),
        busy_intervals = busy.len(),
        booked_today,
        slots = slots.len(),
        "computed candidate slots"
    );

    Ok(slots)
}

/// Compute and render the availability of a request.
///
/// A misconfigured event type yields zero slots with `config_error` set rather
/// than an error, so one bad event type cannot break the others.
///
/// # Errors
/// Returns `SlotError::InvalidTimezone` if the requester timezone is unknown.
pub fn calculate(request: &SlotRequest<'_>) -> Result<Availability> {
    let requester_tz = parse_timezone(request.requester_timezone)?;

    let (slots, config_error) = match candidate_slots(request) {
        Ok(slots) => (present_slots(&slots, requester_tz), None),
        Err(SlotError::Configuration(msg)) => {
            debug!(event_type = %request.event_type.id, error = %msg, "misconfigured event type");
            (Vec::new(), Some(msg))
        }
        Err(e) => return Err(e),
    };

    Ok(Availability {
        event_type_id: request.event_type.id.clone(),
        date: request.date,
        timezone: request.requester_timezone.to_string(),
        count: slots.len(),
        slots,
        external_checked: request.external_busy.is_some(),
        config_error,
    })
}
