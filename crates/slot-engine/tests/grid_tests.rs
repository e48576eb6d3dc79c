//! Tests for slot grid generation.

use chrono::{DateTime, TimeZone, Utc};
use slot_engine::grid::{generate_for, generate_slots, grid_end, slot_count};
use slot_engine::{SlotDuration, Timeslot};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn timeslot(id: &str, start: (u32, u32), end: (u32, u32)) -> Timeslot {
    Timeslot {
        id: id.to_string(),
        timeslot_name: format!("Session {}", id),
        start_time: at(start.0, start.1),
        end_time: at(end.0, end.1),
        is_available: true,
        description: None,
    }
}

fn thirty() -> SlotDuration {
    SlotDuration::default()
}

// ── Whole windows ───────────────────────────────────────────────────────────

#[test]
fn two_hour_window_yields_four_half_hour_cells() {
    let ts = timeslot("t1", (9, 0), (11, 0));
    let slots = generate_slots(&ts, thirty());

    assert_eq!(slots.len(), 4);
    let bounds: Vec<_> = slots.iter().map(|s| (s.start, s.end)).collect();
    assert_eq!(
        bounds,
        vec![
            (at(9, 0), at(9, 30)),
            (at(9, 30), at(10, 0)),
            (at(10, 0), at(10, 30)),
            (at(10, 30), at(11, 0)),
        ]
    );
    for (i, slot) in slots.iter().enumerate() {
        assert_eq!(slot.id, format!("t1-{}", i));
        assert_eq!(slot.timeslot_id, "t1");
        assert_eq!(slot.timeslot_name, "Session t1");
        assert!(!slot.is_occupied);
        assert!(!slot.is_grouped);
        assert!(slot.webinar.is_none());
        assert_eq!(slot.span_cells, 1);
    }
}

#[test]
fn trailing_partial_slot_is_dropped() {
    let ts = timeslot("t1", (9, 0), (10, 45));
    let slots = generate_slots(&ts, thirty());

    assert_eq!(slots.len(), 3);
    assert_eq!(slots[2].end, at(10, 30), "last cell must not run past the window");
    assert_eq!(grid_end(&ts, thirty()), at(10, 30));
}

#[test]
fn custom_slot_duration() {
    let ts = timeslot("t1", (9, 0), (11, 0));
    let slot = SlotDuration::minutes(45).unwrap();

    let slots = generate_slots(&ts, slot);
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].start, at(9, 45));
    assert_eq!(slots[1].end, at(10, 30));
}

// ── Degenerate windows ──────────────────────────────────────────────────────

#[test]
fn inverted_window_yields_nothing() {
    let ts = timeslot("t1", (11, 0), (9, 0));
    assert!(generate_slots(&ts, thirty()).is_empty());
    assert_eq!(slot_count(&ts, thirty()), 0);
    assert_eq!(grid_end(&ts, thirty()), ts.start_time);
}

#[test]
fn empty_window_yields_nothing() {
    let ts = timeslot("t1", (9, 0), (9, 0));
    assert!(generate_slots(&ts, thirty()).is_empty());
}

#[test]
fn window_shorter_than_one_slot_yields_nothing() {
    let ts = timeslot("t1", (9, 0), (9, 20));
    assert!(generate_slots(&ts, thirty()).is_empty());
}

#[test]
fn missing_timeslot_yields_nothing() {
    assert!(generate_for(None, thirty()).is_empty());

    let ts = timeslot("t1", (9, 0), (10, 0));
    assert_eq!(generate_for(Some(&ts), thirty()).len(), 2);
}

// ── Very long windows ───────────────────────────────────────────────────────

#[test]
fn grid_end_stays_inside_a_multi_century_window() {
    let ts = Timeslot {
        start_time: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(6200, 1, 1, 0, 0, 0).unwrap(),
        ..timeslot("t1", (9, 0), (11, 0))
    };
    let one_minute = SlotDuration::minutes(1).unwrap();

    let count = slot_count(&ts, one_minute);
    assert!(count > i32::MAX as usize, "cell count exceeds i32: {}", count);
    assert_eq!(grid_end(&ts, one_minute), ts.end_time);

    let seven = SlotDuration::minutes(7).unwrap();
    let end = grid_end(&ts, seven);
    assert!(end > ts.start_time && end <= ts.end_time);
    assert!(ts.end_time - end < chrono::Duration::minutes(7));
}
