//! Error types for slot-engine operations.
//!
//! The scheduling algorithms themselves never fail. Errors only surface at the
//! data boundary (normalizing provider records), when building a slot duration,
//! when picker state round-tripped through JS fails validation, and when a
//! form submits without a picked schedule.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Webinar '{0}' has no timeslot reference")]
    MissingTimeslotRef(String),

    #[error("Webinar '{0}' has a zero-minute duration")]
    InvalidDuration(String),

    #[error("Slot duration must be at least one minute, got {0}")]
    InvalidSlotDuration(u32),

    #[error("Invalid picker state: {0}")]
    InvalidPickerState(String),

    #[error("No start time and duration selected")]
    MissingSchedule,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchedulingError>;
