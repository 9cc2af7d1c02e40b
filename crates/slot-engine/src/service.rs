//! The orchestration stage: fetch collaborator data, then run the pure engine.
//!
//! Confirmed bookings are required and their failure aborts the calculation.
//! External calendar data is best-effort: a failure or a timeout is logged and
//! the calculation proceeds with `external_checked = false`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, Duration as ChronoDuration, NaiveDate};
use futures::future::join_all;
use tracing::{debug, instrument, warn};

use crate::engine::{calculate, Availability, SlotRequest};
use crate::error::{Result, SlotError};
use crate::event_type::EventTypeConfig;
use crate::interval::Interval;
use crate::provider::{
    BookingProvider, Clock, EventTypeProvider, ExternalCalendarProvider, InMemoryStore,
    SystemClock,
};
use crate::time::local_day_bounds;

/// Default upper bound on the external calendar fetch.
pub const DEFAULT_EXTERNAL_TIMEOUT: Duration = Duration::from_secs(2);

/// Computes availability from provider-supplied data.
///
/// Holds no mutable state, so one instance can serve concurrent calculations.
#[derive(Clone)]
pub struct AvailabilityService {
    event_types: Arc<dyn EventTypeProvider>,
    bookings: Arc<dyn BookingProvider>,
    external: Option<Arc<dyn ExternalCalendarProvider>>,
    clock: Arc<dyn Clock>,
    external_timeout: Duration,
}

impl AvailabilityService {
    pub fn new(
        event_types: Arc<dyn EventTypeProvider>,
        bookings: Arc<dyn BookingProvider>,
    ) -> Self {
        Self {
            event_types,
            bookings,
            external: None,
            clock: Arc::new(SystemClock),
            external_timeout: DEFAULT_EXTERNAL_TIMEOUT,
        }
    }

    /// A service backed entirely by one [`InMemoryStore`], external calendar
    /// included.
    pub fn from_store(store: InMemoryStore) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone()).with_external_calendar(store)
    }

    pub fn with_external_calendar(mut self, external: Arc<dyn ExternalCalendarProvider>) -> Self {
        self.external = Some(external);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_external_timeout(mut self, timeout: Duration) -> Self {
        self.external_timeout = timeout;
        self
    }

    /// Availability of one event type on one host-local date.
    ///
    /// # Errors
    /// - `SlotError::NotFound` if the event type is unknown or inactive.
    /// - `SlotError::RequiredDataUnavailable` if bookings cannot be loaded.
    /// - `SlotError::InvalidTimezone` if `requester_timezone` is unknown.
    #[instrument(skip(self, date), fields(date = %date))]
    pub async fn availability(
        &self,
        event_type_id: &str,
        date: NaiveDate,
        requester_timezone: &str,
    ) -> Result<Availability> {
        let now = self.clock.now();
        let config = self.event_types.event_type(event_type_id).await?;

        let day = match config
            .validate()
            .and_then(|()| config.timezone())
            .and_then(|tz| local_day_bounds(tz, date))
        {
            Ok(day) => day,
            Err(e) => {
                // Nothing to fetch for a misconfigured event type; the engine
                // reports it as zero availability.
                debug!(event_type = %config.id, error = %e, "skipping fetches");
                return calculate(&SlotRequest {
                    event_type: &config,
                    date,
                    requester_timezone,
                    now,
                    bookings: &[],
                    external_busy: None,
                });
            }
        };

        // A booking obstructs [start - before, end + after), so bookings up to
        // `after` before the day and `before` after it still reach into it.
        let buffers = config.buffers();
        let reach = day.widened(
            ChronoDuration::minutes(i64::from(buffers.after_minutes)),
            ChronoDuration::minutes(i64::from(buffers.before_minutes)),
        );
        let bookings = self
            .bookings
            .confirmed_bookings(&config.host_id, reach)
            .await
            .map_err(|e| match e {
                SlotError::RequiredDataUnavailable(_) => e,
                other => SlotError::RequiredDataUnavailable(other.to_string()),
            })?;
        let external = self.external_busy(&config, day).await;

        calculate(&SlotRequest {
            event_type: &config,
            date,
            requester_timezone,
            now,
            bookings: &bookings,
            external_busy: external.as_deref(),
        })
    }

    /// Availability of several event types on one date.
    ///
    /// Calculations run concurrently and fail independently; results keep the
    /// order of `event_type_ids`.
    pub async fn availability_many(
        &self,
        event_type_ids: &[&str],
        date: NaiveDate,
        requester_timezone: &str,
    ) -> Vec<(String, Result<Availability>)> {
        let calculations = event_type_ids.iter().map(|id| async move {
            let result = self.availability(id, date, requester_timezone).await;
            (id.to_string(), result)
        });
        join_all(calculations).await
    }

    /// Dates among the `days` consecutive dates starting at `from` that have at
    /// least one slot.
    ///
    /// # Errors
    /// Propagates the first fatal error of any per-date calculation.
    #[instrument(skip(self, from), fields(from = %from))]
    pub async fn next_available_dates(
        &self,
        event_type_id: &str,
        from: NaiveDate,
        days: u32,
        requester_timezone: &str,
    ) -> Result<Vec<NaiveDate>> {
        let mut found = Vec::new();
        for offset in 0..days {
            let Some(date) = from.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            let availability = self
                .availability(event_type_id, date, requester_timezone)
                .await?;
            if availability.config_error.is_some() {
                break;
            }
            if availability.count > 0 {
                found.push(date);
            }
        }
        Ok(found)
    }

    /// Fetch external busy periods for the host-local `day`, or `None` when
    /// there is no external calendar or it did not answer in time.
    async fn external_busy(&self, config: &EventTypeConfig, day: Interval) -> Option<Vec<Interval>> {
        let external = self.external.as_ref()?;

        match tokio::time::timeout(
            self.external_timeout,
            external.busy_intervals(&config.host_id, day),
        )
        .await
        {
            Ok(Ok(busy)) => {
                debug!(host = %config.host_id, intervals = busy.len(), "external calendar checked");
                Some(busy)
            }
            Ok(Err(e)) => {
                warn!(host = %config.host_id, error = %e, "external calendar unavailable, using internal bookings only");
                None
            }
            Err(_) => {
                warn!(
                    host = %config.host_id,
                    timeout_ms = self.external_timeout.as_millis() as u64,
                    "external calendar timed out, using internal bookings only"
                );
                None
            }
        }
    }
}
