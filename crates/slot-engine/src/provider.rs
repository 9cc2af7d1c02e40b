//! Collaborator ports consumed by [`crate::service::AvailabilityService`].
//!
//! The engine only needs event type lookup, confirmed bookings, optional
//! external busy periods and the current time. [`InMemoryStore`] implements the
//! data ports from serde-loadable fixtures.

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};
use crate::event_type::EventTypeConfig;
use crate::interval::Interval;

/// Source of event type configuration.
#[async_trait]
pub trait EventTypeProvider: Send + Sync {
    /// Fails with `SlotError::NotFound` for unknown or inactive event types.
    async fn event_type(&self, event_type_id: &str) -> Result<EventTypeConfig>;
}

/// Source of confirmed bookings. Authoritative: failures abort the calculation.
#[async_trait]
pub trait BookingProvider: Send + Sync {
    /// Confirmed bookings of `host_id` intersecting `range`, sorted by start.
    ///
    /// Bookings that start before or end after `range` are included.
    async fn confirmed_bookings(&self, host_id: &str, range: Interval) -> Result<Vec<Interval>>;
}

/// Source of busy periods from a third-party calendar. Advisory only.
#[async_trait]
pub trait ExternalCalendarProvider: Send + Sync {
    /// Busy periods of `host_id` intersecting `range`. Fails with
    /// `SlotError::UpstreamUnavailable` when the calendar cannot be reached.
    async fn busy_intervals(&self, host_id: &str, range: Interval) -> Result<Vec<Interval>>;
}

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Pending,
    Cancelled,
}

/// A booking row as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredBooking {
    pub host_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: BookingStatus,
}

/// A busy period reported by a host's external calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalBusy {
    pub host_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Fixture-backed implementation of every data port.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InMemoryStore {
    pub event_types: Vec<EventTypeConfig>,
    pub bookings: Vec<StoredBooking>,
    pub external_busy: Vec<ExternalBusy>,
    /// Make every booking lookup fail.
    pub bookings_unavailable: bool,
    /// Make every external calendar lookup fail.
    pub external_unavailable: bool,
    /// Delay external calendar responses, to exercise timeouts.
    pub external_delay_ms: Option<u64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from its JSON fixture representation.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn with_event_type(mut self, event_type: EventTypeConfig) -> Self {
        self.event_types.push(event_type);
        self
    }

    pub fn with_booking(mut self, host_id: &str, booking: Interval) -> Self {
        self.bookings.push(StoredBooking {
            host_id: host_id.to_string(),
            start: booking.start,
            end: booking.end,
            status: BookingStatus::Confirmed,
        });
        self
    }

    pub fn with_external_busy(mut self, host_id: &str, busy: Interval) -> Self {
        self.external_busy.push(ExternalBusy {
            host_id: host_id.to_string(),
            start: busy.start,
            end: busy.end,
        });
        self
    }
}

#[async_trait]
impl EventTypeProvider for InMemoryStore {
    async fn event_type(&self, event_type_id: &str) -> Result<EventTypeConfig> {
        self.event_types
            .iter()
            .find(|et| et.id == event_type_id && et.active)
            .cloned()
            .ok_or_else(|| SlotError::NotFound(event_type_id.to_string()))
    }
}

#[async_trait]
impl BookingProvider for InMemoryStore {
    async fn confirmed_bookings(&self, host_id: &str, range: Interval) -> Result<Vec<Interval>> {
        if self.bookings_unavailable {
            return Err(SlotError::RequiredDataUnavailable(
                "booking store offline".to_string(),
            ));
        }
        let mut bookings: Vec<Interval> = self
            .bookings
            .iter()
            .filter(|b| b.host_id == host_id && b.status == BookingStatus::Confirmed)
            .map(|b| Interval::new(b.start, b.end))
            .filter(|b| b.overlaps(&range))
            .collect();
        bookings.sort();
        Ok(bookings)
    }
}

#[async_trait]
impl ExternalCalendarProvider for InMemoryStore {
    async fn busy_intervals(&self, host_id: &str, range: Interval) -> Result<Vec<Interval>> {
        if let Some(ms) = self.external_delay_ms {
            tokio::time::sleep(StdDuration::from_millis(ms)).await;
        }
        if self.external_unavailable {
            return Err(SlotError::UpstreamUnavailable(
                "external calendar offline".to_string(),
            ));
        }
        Ok(self
            .external_busy
            .iter()
            .filter(|b| b.host_id == host_id)
            .map(|b| Interval::new(b.start, b.end))
            .filter(|b| b.overlaps(&range))
            .collect())
    }
}
