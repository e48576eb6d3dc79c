//! Utilization statistics across one or many timeslots.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interval::SlotDuration;
use crate::model::{Timeslot, Webinar};
use crate::occupancy;
use crate::slot::CandidateSlot;

/// Aggregate counts shown on the scheduling dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_slots: usize,
    pub booked_slots: usize,
    pub available_slots: usize,
    /// Percentage of slots booked, rounded half up. 0 when there are no slots.
    pub utilization_rate: u32,
    pub total_webinars: usize,
    pub past_timeslots: usize,
    pub upcoming_timeslots: usize,
}

/// Per-timeslot counts for summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeslotSummary {
    pub timeslot_id: String,
    pub timeslot_name: String,
    pub total_slots: usize,
    pub booked_slots: usize,
    pub available_slots: usize,
    pub utilization_rate: u32,
}

/// `round(booked / total × 100)` in integer arithmetic, 0 for an empty grid.
pub fn utilization_rate(booked: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let booked = booked.min(total) as u64;
    let total = total as u64;
    ((booked * 200 + total) / (total * 2)) as u32
}

fn count_booked(slots: &[CandidateSlot]) -> usize {
    slots.iter().filter(|s| s.is_occupied).count()
}

/// Compute [`Stats`] against the current wall-clock time.
///
/// The clock is read once, so every timeslot is judged against the same instant.
pub fn compute_stats(timeslots: &[Timeslot], webinars: &[Webinar], slot: SlotDuration) -> Stats {
    compute_stats_at(timeslots, webinars, slot, Utc::now())
}

/// Compute [`Stats`] as of `now`.
pub fn compute_stats_at(
    timeslots: &[Timeslot],
    webinars: &[Webinar],
    slot: SlotDuration,
    now: DateTime<Utc>,
) -> Stats {
    let slots = occupancy::resolve_all(timeslots, webinars, slot);
    let total_slots = slots.len();
    let booked_slots = count_booked(&slots);

    let total_webinars = webinars
        .iter()
        .map(|w| w.id.as_str())
        .collect::<HashSet<_>>()
        .len();

    Stats {
        total_slots,
        booked_slots,
        available_slots: total_slots - booked_slots,
        utilization_rate: utilization_rate(booked_slots, total_slots),
        total_webinars,
        past_timeslots: timeslots.iter().filter(|t| t.end_time < now).count(),
        upcoming_timeslots: timeslots.iter().filter(|t| t.start_time > now).count(),
    }
}

/// One [`TimeslotSummary`] per timeslot, in input order.
pub fn timeslot_summaries(
    timeslots: &[Timeslot],
    webinars: &[Webinar],
    slot: SlotDuration,
) -> Vec<TimeslotSummary> {
    timeslots
        .iter()
        .map(|ts| {
            let slots = occupancy::resolve_timeslot(ts, webinars, slot);
            let booked = count_booked(&slots);
            TimeslotSummary {
                timeslot_id: ts.id.clone(),
                timeslot_name: ts.timeslot_name.clone(),
                total_slots: slots.len(),
                booked_slots: booked,
                available_slots: slots.len() - booked,
                utilization_rate: utilization_rate(booked, slots.len()),
            }
        })
        .collect()
}
