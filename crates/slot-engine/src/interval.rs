//! Half-open time intervals and minute-granularity arithmetic.
//!
//! Every interval in the engine is `[start, end)`. Two intervals overlap iff
//! `a.start < b.end && b.start < a.end`, so intervals that merely touch
//! (one ends exactly when the other starts) never overlap.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};

/// Default grid granularity used across the platform.
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

/// A positive slot length in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SlotDuration(u32);

impl SlotDuration {
    /// Build a slot duration, rejecting zero.
    pub fn minutes(minutes: u32) -> Result<Self> {
        if minutes == 0 {
            return Err(SchedulingError::InvalidSlotDuration(minutes));
        }
        Ok(Self(minutes))
    }

    pub fn as_minutes(self) -> u32 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }

    /// Number of cells needed to cover `minutes`, rounding up.
    pub fn cells_for(self, minutes: i64) -> u32 {
        if minutes <= 0 {
            return 0;
        }
        let slot = i64::from(self.0);
        u32::try_from((minutes + slot - 1) / slot).unwrap_or(u32::MAX)
    }
}

impl Default for SlotDuration {
    fn default() -> Self {
        Self(DEFAULT_SLOT_MINUTES)
    }
}

impl TryFrom<u32> for SlotDuration {
    type Error = SchedulingError;

    fn try_from(minutes: u32) -> Result<Self> {
        Self::minutes(minutes)
    }
}

impl From<SlotDuration> for u32 {
    fn from(d: SlotDuration) -> Self {
        d.0
    }
}

/// A half-open `[start, end)` span of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Interval starting at `start` and lasting `minutes`.
    pub fn from_minutes(start: DateTime<Utc>, minutes: u32) -> Self {
        Self {
            start,
            end: start + Duration::minutes(i64::from(minutes)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Strict half-open overlap. Touching intervals do not overlap.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Minutes shared by both intervals, zero when they do not overlap.
    pub fn overlap_minutes(&self, other: &Interval) -> i64 {
        if !self.overlaps(other) {
            return 0;
        }
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (end - start).num_minutes()
    }
}

/// Parse an ISO 8601 instant into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (with offset or `Z`) and naive local time such as
/// `2026-03-16T09:00:00` or `2026-03-16T09:00:00.000`, which is taken as UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map(|ndt| ndt.and_utc())
        .map_err(|e| SchedulingError::InvalidTimestamp {
            value: s.to_string(),
            reason: e.to_string(),
        })
}
