//! # slot-engine
//!
//! Scheduling core for job-fair webinars.
//!
//! Admins define timeslots (windows such as a morning session block); hosts
//! book webinars inside them. The engine cuts each timeslot into a grid of
//! fixed-size slots, folds existing bookings into that grid, drives the
//! contiguous range picker used by the webinar form, and reports utilization.
//! Everything here is pure computation over half-open time intervals.
//!
//! ## Modules
//!
//! - [`interval`]: half-open intervals, slot durations, ISO 8601 parsing
//! - [`model`]: timeslots, webinars, and provider-record normalization
//! - [`grid`]: timeslot window → ordered grid of candidate slots
//! - [`occupancy`]: merge bookings into the grid, double-booking checks
//! - [`selection`]: range picker state machine
//! - [`slot`]: candidate slots and booking links
//! - [`stats`]: utilization statistics
//! - [`config`]: engine settings
//! - [`error`]: error types

pub mod config;
pub mod error;
pub mod grid;
pub mod interval;
pub mod model;
pub mod occupancy;
pub mod selection;
pub mod slot;
pub mod stats;

pub use config::SchedulerConfig;
pub use error::SchedulingError;
pub use grid::generate_slots;
pub use interval::{Interval, SlotDuration};
pub use model::{Timeslot, Webinar};
pub use occupancy::{resolve_all, resolve_occupancy};
pub use selection::{PickerMsg, PickerState, ScheduledRange, Selection};
pub use slot::CandidateSlot;
pub use stats::{compute_stats, Stats};
