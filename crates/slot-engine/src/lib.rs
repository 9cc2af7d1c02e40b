//! # slot-engine
//!
//! Bookable slot calculation for meeting scheduling.
//!
//! Given an event type's weekly schedule and booking policy, a target date and
//! the host's existing commitments, the engine produces the exact set of
//! bookable slots, rendered in the requester's timezone. All interval
//! arithmetic happens in absolute instants derived from the host's timezone;
//! conversion to the requester's zone happens only when rendering.
//!
//! ## Modules
//!
//! - [`time`]: wall-clock ↔ instant conversion with a fixed DST policy
//! - [`interval`]: half-open instant ranges, merging and subtraction
//! - [`schedule`]: weekly schedule → open ranges for a date
//! - [`policy`]: booking-window policy (rolling, fixed range, indefinite)
//! - [`busy`]: bookings + external calendar → coalesced busy set
//! - [`generator`]: free ranges → candidate slots
//! - [`presenter`]: candidate slots → display strings
//! - [`event_type`]: event type configuration and validation
//! - [`engine`]: the pure calculation stage
//! - [`provider`]: collaborator ports and an in-memory implementation
//! - [`service`]: orchestration: fetch, degrade, calculate
//! - [`error`]: Error types

pub mod busy;
pub mod engine;
pub mod error;
pub mod event_type;
pub mod generator;
pub mod interval;
pub mod policy;
pub mod presenter;
pub mod provider;
pub mod schedule;
pub mod service;
pub mod time;

pub use busy::{aggregate_busy, BusyInterval, BusySource, Buffers};
pub use engine::{calculate, candidate_slots, Availability, SlotRequest};
pub use error::SlotError;
pub use event_type::EventTypeConfig;
pub use generator::{generate_slots, CandidateSlot, SlotParams};
pub use interval::Interval;
pub use policy::RangePolicy;
pub use presenter::{present_slots, SlotDisplay};
pub use schedule::{open_ranges, LocalRange, WeeklySchedule};
pub use service::AvailabilityService;
pub use time::LocalTime;
