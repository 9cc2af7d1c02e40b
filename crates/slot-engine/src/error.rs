//! Error types for slot-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    /// Malformed event type configuration. Surfaced as zero availability by
    /// [`crate::engine::calculate`], never as a failed calculation.
    #[error("Invalid event type configuration: {0}")]
    Configuration(String),

    #[error("Event type not found: {0}")]
    NotFound(String),

    /// Confirmed bookings could not be loaded. Fatal for the calculation.
    #[error("Required booking data unavailable: {0}")]
    RequiredDataUnavailable(String),

    /// External calendar lookup failed or timed out. Recovered by the service.
    #[error("External calendar unavailable: {0}")]
    UpstreamUnavailable(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
