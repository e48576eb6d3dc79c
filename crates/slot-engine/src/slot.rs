//! Candidate slots: the derived, never-persisted unit handed to renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::Interval;
use crate::model::{Timeslot, WebinarRef};

/// One raw grid cell or one webinar's merged span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSlot {
    /// `{timeslot}-{index}` for grid cells, `{timeslot}-webinar-{webinar}` for grouped slots.
    pub id: String,
    pub timeslot_id: String,
    pub timeslot_name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_occupied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webinar: Option<WebinarRef>,
    /// True when this slot stands for a whole booking rather than one grid cell.
    pub is_grouped: bool,
    /// Grid cells this slot covers when rendered, rounded up.
    pub span_cells: u32,
}

impl CandidateSlot {
    pub(crate) fn cell(timeslot: &Timeslot, index: usize, span: Interval) -> Self {
        Self {
            id: cell_id(&timeslot.id, index),
            timeslot_id: timeslot.id.clone(),
            timeslot_name: timeslot.timeslot_name.clone(),
            start: span.start,
            end: span.end,
            is_occupied: false,
            webinar: None,
            is_grouped: false,
            span_cells: 1,
        }
    }

    pub fn interval(&self) -> Interval {
        Interval::new(self.start, self.end)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    pub fn is_available(&self) -> bool {
        !self.is_occupied
    }

    /// Navigation target for booking this slot, `None` if it is taken.
    pub fn booking_link(&self) -> Option<BookingLink> {
        self.is_available().then(|| BookingLink {
            timeslot: self.timeslot_id.clone(),
            start_time: self.start,
        })
    }
}

/// Query parameters the UI uses to open the webinar form on an open slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingLink {
    pub timeslot: String,
    pub start_time: DateTime<Utc>,
}

pub(crate) fn cell_id(timeslot_id: &str, index: usize) -> String {
    format!("{}-{}", timeslot_id, index)
}

pub(crate) fn grouped_id(timeslot_id: &str, webinar_id: &str) -> String {
    format!("{}-webinar-{}", timeslot_id, webinar_id)
}
