//! Timeslots, webinars, and the provider records they are normalized from.
//!
//! Providers hand us loosely shaped JSON: instants are ISO 8601 strings and a
//! webinar points at its timeslot either with a flat `timeslotId` or a nested
//! `timeslot: { id }` object. Both are folded into one canonical
//! [`Webinar::timeslot_id`] here, so the algorithms never look at the raw shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};
use crate::interval::{parse_instant, Interval};

/// An admin-defined window within which webinars may be booked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeslot {
    pub id: String,
    pub timeslot_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_available() -> bool {
    true
}

impl Timeslot {
    pub fn window(&self) -> Interval {
        Interval::new(self.start_time, self.end_time)
    }
}

/// A booked webinar, already normalized to a single timeslot reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webinar {
    pub id: String,
    pub title: String,
    pub timeslot_id: String,
    pub scheduled_start_time: DateTime<Utc>,
    /// Length of the booking in minutes.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Webinar {
    pub fn span(&self) -> Interval {
        Interval::from_minutes(self.scheduled_start_time, self.duration)
    }

    pub fn belongs_to(&self, timeslot: &Timeslot) -> bool {
        self.timeslot_id == timeslot.id
    }
}

/// Lightweight pointer from a candidate slot to the webinar occupying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebinarRef {
    pub id: String,
    pub title: String,
}

impl From<&Webinar> for WebinarRef {
    fn from(w: &Webinar) -> Self {
        Self {
            id: w.id.clone(),
            title: w.title.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider records
// ---------------------------------------------------------------------------

/// A timeslot as the timeslot provider serves it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotRecord {
    pub id: String,
    pub timeslot_name: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TimeslotRecord {
    pub fn normalize(self) -> Result<Timeslot> {
        Ok(Timeslot {
            start_time: parse_instant(&self.start_time)?,
            end_time: parse_instant(&self.end_time)?,
            is_available: self.is_available.unwrap_or(true),
            id: self.id,
            timeslot_name: self.timeslot_name,
            description: self.description,
        })
    }
}

/// Nested `{ id }` form of the timeslot reference.
#[derive(Debug, Clone, Deserialize)]
pub struct TimeslotLink {
    pub id: String,
}

/// A webinar as the webinar provider serves it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebinarRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub timeslot_id: Option<String>,
    #[serde(default)]
    pub timeslot: Option<TimeslotLink>,
    pub scheduled_start_time: String,
    pub duration: u32,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl WebinarRecord {
    /// Resolve the timeslot linkage and parse the start instant.
    ///
    /// The flat `timeslotId` wins when both forms are present.
    pub fn normalize(self) -> Result<Webinar> {
        let timeslot_id = match (self.timeslot_id, self.timeslot) {
            (Some(id), _) if !id.is_empty() => id,
            (_, Some(link)) if !link.id.is_empty() => link.id,
            _ => return Err(SchedulingError::MissingTimeslotRef(self.id)),
        };
        if self.duration == 0 {
            return Err(SchedulingError::InvalidDuration(self.id));
        }
        Ok(Webinar {
            scheduled_start_time: parse_instant(&self.scheduled_start_time)?,
            timeslot_id,
            id: self.id,
            title: self.title,
            duration: self.duration,
            host: self.host,
            status: self.status,
        })
    }
}

/// A `{ timeslots, webinars }` document, e.g. a dump of both providers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleExport {
    #[serde(default)]
    pub timeslots: Vec<TimeslotRecord>,
    #[serde(default)]
    pub webinars: Vec<WebinarRecord>,
}

/// Normalized contents of a [`ScheduleExport`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    pub timeslots: Vec<Timeslot>,
    pub webinars: Vec<Webinar>,
}

impl ScheduleExport {
    pub fn normalize(self) -> Result<Schedule> {
        Ok(Schedule {
            timeslots: normalize_timeslots(self.timeslots)?,
            webinars: normalize_webinars(self.webinars)?,
        })
    }
}

pub fn normalize_timeslots(records: Vec<TimeslotRecord>) -> Result<Vec<Timeslot>> {
    records.into_iter().map(TimeslotRecord::normalize).collect()
}

pub fn normalize_webinars(records: Vec<WebinarRecord>) -> Result<Vec<Webinar>> {
    records.into_iter().map(WebinarRecord::normalize).collect()
}

/// Parse and normalize a `{ timeslots, webinars }` JSON document.
pub fn load_schedule(json: &str) -> Result<Schedule> {
    let export: ScheduleExport = serde_json::from_str(json)?;
    export.normalize()
}
