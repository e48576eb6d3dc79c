//! Merge webinar bookings into a timeslot's slot grid.
//!
//! The grid is walked with a cursor. Every booking that overlaps the cell under
//! the cursor is emitted once, as a single grouped slot covering the booking's
//! real span, and the cursor jumps to the booking's end. When a booking ends
//! mid-cell the grid realigns there, so the next available cell starts where
//! the booking stops. The emitted slots always tile the grid's extent: no gaps,
//! no overlaps, no webinar listed twice.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::grid;
use crate::interval::{Interval, SlotDuration};
use crate::model::{Timeslot, Webinar, WebinarRef};
use crate::slot::{grouped_id, CandidateSlot};

/// Bookings that belong to `timeslot`, ordered by start then id.
fn bookings_for<'a>(timeslot: &Timeslot, webinars: &'a [Webinar]) -> Vec<&'a Webinar> {
    let mut bookings: Vec<&Webinar> = webinars
        .iter()
        .filter(|w| w.belongs_to(timeslot) && w.duration > 0)
        .collect();
    bookings.sort_by(|a, b| {
        (a.scheduled_start_time, &a.id).cmp(&(b.scheduled_start_time, &b.id))
    });
    bookings
}

/// Resolve bookings against a pre-generated grid for one timeslot.
///
/// `cells` is the output of [`grid::generate_slots`] for the same timeslot and
/// slot duration. Available slots are numbered in emission order, so with no
/// bookings the result equals the input grid.
pub fn resolve_occupancy(
    timeslot: &Timeslot,
    cells: &[CandidateSlot],
    webinars: &[Webinar],
    slot: SlotDuration,
) -> Vec<CandidateSlot> {
    let (Some(first), Some(last)) = (cells.first(), cells.last()) else {
        return Vec::new();
    };
    let extent_end = last.end;
    let step = slot.as_duration();
    let bookings = bookings_for(timeslot, webinars);

    let mut emitted: HashSet<&str> = HashSet::new();
    let mut resolved = Vec::with_capacity(cells.len());
    let mut cursor = first.start;

    let push_available = |resolved: &mut Vec<CandidateSlot>, span: Interval| {
        let index = resolved.len();
        resolved.push(CandidateSlot::cell(timeslot, index, span));
    };

    while cursor < extent_end {
        let cell = Interval::new(cursor, (cursor + step).min(extent_end));
        let hit = bookings
            .iter()
            .copied()
            .find(|w| !emitted.contains(w.id.as_str()) && w.span().overlaps(&cell));

        let Some(webinar) = hit else {
            push_available(&mut resolved, cell);
            cursor = cell.end;
            continue;
        };

        let booked = webinar.span();
        if booked.start > cursor {
            push_available(&mut resolved, Interval::new(cursor, booked.start));
        }

        let span = Interval::new(booked.start.max(cursor), booked.end.min(extent_end));
        if span != booked {
            tracing::debug!(
                webinar = %webinar.id,
                timeslot = %timeslot.id,
                "booking clipped to the free part of the grid"
            );
        }

        resolved.push(CandidateSlot {
            id: grouped_id(&timeslot.id, &webinar.id),
            timeslot_id: timeslot.id.clone(),
            timeslot_name: timeslot.timeslot_name.clone(),
            start: span.start,
            end: span.end,
            is_occupied: true,
            webinar: Some(WebinarRef::from(webinar)),
            is_grouped: true,
            span_cells: slot.cells_for(span.duration_minutes()),
        });
        emitted.insert(webinar.id.as_str());
        cursor = span.end;
    }

    resolved
}

/// Generate the grid for `timeslot` and resolve its bookings in one step.
pub fn resolve_timeslot(
    timeslot: &Timeslot,
    webinars: &[Webinar],
    slot: SlotDuration,
) -> Vec<CandidateSlot> {
    let cells = grid::generate_slots(timeslot, slot);
    resolve_occupancy(timeslot, &cells, webinars, slot)
}

/// Resolve every timeslot independently, then merge into one list by start time.
pub fn resolve_all(
    timeslots: &[Timeslot],
    webinars: &[Webinar],
    slot: SlotDuration,
) -> Vec<CandidateSlot> {
    let mut all: Vec<CandidateSlot> = timeslots
        .iter()
        .flat_map(|ts| resolve_timeslot(ts, webinars, slot))
        .collect();
    all.sort_by_key(|s| s.start);
    all
}

/// Raw grid cells with per-cell occupancy, as the range picker consumes them.
///
/// A cell is occupied iff some booking of the timeslot strictly overlaps it.
/// Cells keep their own bounds and are never grouped.
pub fn mark_cells(
    timeslot: &Timeslot,
    webinars: &[Webinar],
    slot: SlotDuration,
) -> Vec<CandidateSlot> {
    let bookings = bookings_for(timeslot, webinars);
    grid::generate_slots(timeslot, slot)
        .into_iter()
        .map(|mut cell| {
            let span = cell.interval();
            if let Some(w) = bookings.iter().find(|w| w.span().overlaps(&span)) {
                cell.is_occupied = true;
                cell.webinar = Some(WebinarRef::from(*w));
            }
            cell
        })
        .collect()
}

/// Bookings of `timeslot` that do not fit entirely inside its window.
///
/// These are reported, not repaired: the grid only covers the timeslot itself,
/// so any part of a booking outside it is invisible to the resolver.
pub fn unplaced_bookings<'a>(timeslot: &Timeslot, webinars: &'a [Webinar]) -> Vec<&'a Webinar> {
    let window = timeslot.window();
    webinars
        .iter()
        .filter(|w| w.belongs_to(timeslot) && !window.contains(&w.span()))
        .collect()
}

/// Two bookings in the same timeslot whose spans overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConflict {
    pub timeslot_id: String,
    pub webinar_a: WebinarRef,
    pub webinar_b: WebinarRef,
    pub overlap_minutes: i64,
}

/// Find all pairwise double-bookings among webinars sharing a timeslot.
///
/// Back-to-back bookings (one ends exactly when the next starts) are not
/// conflicts.
pub fn find_booking_conflicts(webinars: &[Webinar]) -> Vec<BookingConflict> {
    let mut conflicts = Vec::new();

    for (i, a) in webinars.iter().enumerate() {
        for b in &webinars[i + 1..] {
            if a.timeslot_id != b.timeslot_id || a.id == b.id {
                continue;
            }
            let (span_a, span_b) = (a.span(), b.span());
            if span_a.overlaps(&span_b) {
                conflicts.push(BookingConflict {
                    timeslot_id: a.timeslot_id.clone(),
                    webinar_a: WebinarRef::from(a),
                    webinar_b: WebinarRef::from(b),
                    overlap_minutes: span_a.overlap_minutes(&span_b),
                });
            }
        }
    }

    conflicts
}
