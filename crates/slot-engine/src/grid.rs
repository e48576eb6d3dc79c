//! Partition a timeslot window into fixed-size candidate slots.

use chrono::{DateTime, Duration, Utc};

use crate::interval::{Interval, SlotDuration};
use crate::model::Timeslot;
use crate::slot::CandidateSlot;

/// Number of whole slots that fit in the timeslot window.
///
/// A trailing partial slot is not counted. Returns 0 when `end <= start`.
pub fn slot_count(timeslot: &Timeslot, slot: SlotDuration) -> usize {
    usize::try_from(whole_slots(timeslot, slot)).unwrap_or(usize::MAX)
}

fn whole_slots(timeslot: &Timeslot, slot: SlotDuration) -> i64 {
    let minutes = timeslot.window().duration_minutes();
    if minutes <= 0 {
        return 0;
    }
    minutes / i64::from(slot.as_minutes())
}

/// End of the tiled extent: `start + slot × slot_count`.
///
/// Never past `end_time`, so the offset always fits in the timeslot's own span.
pub fn grid_end(timeslot: &Timeslot, slot: SlotDuration) -> DateTime<Utc> {
    let minutes = whole_slots(timeslot, slot) * i64::from(slot.as_minutes());
    timeslot.start_time + Duration::minutes(minutes)
}

/// Generate the chronological grid of available cells for a timeslot.
///
/// Each cell is `slot` long and gets the id `{timeslot}-{index}`. A partial
/// slot that would run past `end_time` is dropped rather than padded. An
/// inverted or empty window yields no cells.
pub fn generate_slots(timeslot: &Timeslot, slot: SlotDuration) -> Vec<CandidateSlot> {
    let count = slot_count(timeslot, slot);
    let step = slot.as_duration();
    let mut start = timeslot.start_time;

    (0..count)
        .map(|i| {
            let cell = Interval::new(start, start + step);
            start = cell.end;
            CandidateSlot::cell(timeslot, i, cell)
        })
        .collect()
}

/// [`generate_slots`] for a timeslot that may not be loaded yet.
pub fn generate_for(timeslot: Option<&Timeslot>, slot: SlotDuration) -> Vec<CandidateSlot> {
    timeslot.map_or_else(Vec::new, |ts| generate_slots(ts, slot))
}
