//! Integration tests for the `slots` CLI binary.
//!
//! These use `assert_cmd` and `predicates` to run the real binary against the
//! JSON fixtures, covering every subcommand, stdin input, settings layering,
//! and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: path to the schedule.json fixture.
fn schedule_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/schedule.json")
}

/// Helper: path to the hourly.toml settings fixture.
fn hourly_config_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/hourly.toml")
}

fn slots() -> Command {
    let mut cmd = Command::cargo_bin("slots").unwrap();
    cmd.env_remove("SLOTS_SLOT_MINUTES");
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// grid
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn grid_lists_every_cell() {
    slots()
        .args(["grid", "-i", schedule_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Morning (t1)"))
        .stdout(predicate::str::contains("09:00-09:30  available"))
        .stdout(predicate::str::contains("10:30-11:00  available"))
        .stdout(predicate::str::contains("Afternoon (t2)"))
        .stdout(predicate::str::contains("13:30-14:00  available"));
}

#[test]
fn grid_reads_stdin() {
    let input = std::fs::read_to_string(schedule_path()).unwrap();

    let json = json_stdout(
        slots()
            .args(["grid", "--timeslot", "t1", "--json"])
            .write_stdin(input),
    );
    assert_eq!(json.as_array().unwrap().len(), 4);
    assert_eq!(json[0]["id"], "t1-0");
}

// ─────────────────────────────────────────────────────────────────────────────
// resolve
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn resolve_groups_bookings_and_realigns() {
    slots()
        .args(["resolve", "-i", schedule_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("09:30-10:15  booked     Intro to Rust [w1]"))
        .stdout(predicate::str::contains("10:15-10:45  available"))
        .stdout(predicate::str::contains("10:45-11:00  available"))
        .stdout(predicate::str::contains("13:00-14:00  booked     Hiring Panel [w2]"));
}

#[test]
fn resolve_renders_in_requested_time_zone() {
    // 2026-03-16 is before the EU DST switch, so Berlin is UTC+1.
    slots()
        .args(["resolve", "-i", schedule_path(), "--tz", "Europe/Berlin"])
        .assert()
        .success()
        .stdout(predicate::str::contains("10:30-11:15  booked"));
}

#[test]
fn resolve_json_marks_grouped_slots() {
    let json = json_stdout(slots().args([
        "resolve",
        "-i",
        schedule_path(),
        "--timeslot",
        "t1",
        "--json",
    ]));
    assert_eq!(json["unplaced"], serde_json::json!([]));
    let slots = json["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 4);
    assert_eq!(slots[1]["id"], "t1-webinar-w1");
    assert_eq!(slots[1]["isGrouped"], true);
    assert_eq!(slots[1]["spanCells"], 2);
}

const LATE_BOOKING: &str = r#"{
    "timeslots": [{"id":"t1","timeslotName":"Morning","startTime":"2026-03-16T09:00:00Z","endTime":"2026-03-16T11:00:00Z"}],
    "webinars": [{"id":"w9","title":"Late Talk","timeslotId":"t1","scheduledStartTime":"2026-03-16T10:30:00Z","duration":60}]
}"#;

#[test]
fn resolve_lists_bookings_outside_their_window() {
    slots()
        .arg("resolve")
        .write_stdin(LATE_BOOKING)
        .assert()
        .success()
        .stdout(predicate::str::contains("10:30-11:00  booked     Late Talk [w9]"))
        .stdout(predicate::str::contains("Outside their timeslot:"))
        .stdout(predicate::str::contains("10:30-11:30  Late Talk [w9] in t1"))
        .stderr(predicate::str::contains("webinar is scheduled outside its timeslot window"));
}

#[test]
fn resolve_json_includes_unplaced_bookings() {
    let json = json_stdout(slots().args(["resolve", "--json"]).write_stdin(LATE_BOOKING));
    let unplaced = json["unplaced"].as_array().unwrap();
    assert_eq!(unplaced.len(), 1);
    assert_eq!(unplaced[0]["id"], "w9");
    assert_eq!(json["slots"].as_array().unwrap().len(), 4);
}

// ─────────────────────────────────────────────────────────────────────────────
// stats
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stats_json_at_fixed_instant() {
    let json = json_stdout(slots().args([
        "stats",
        "-i",
        schedule_path(),
        "--now",
        "2026-03-16T12:00:00Z",
        "--json",
    ]));

    assert_eq!(json["totalSlots"], 5);
    assert_eq!(json["bookedSlots"], 2);
    assert_eq!(json["availableSlots"], 3);
    assert_eq!(json["utilizationRate"], 40);
    assert_eq!(json["totalWebinars"], 3);
    assert_eq!(json["pastTimeslots"], 1);
    assert_eq!(json["upcomingTimeslots"], 1);
}

#[test]
fn stats_text_with_per_timeslot_breakdown() {
    slots()
        .args([
            "stats",
            "-i",
            schedule_path(),
            "--now",
            "2026-03-16T12:00:00Z",
            "--per-timeslot",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Utilization:        40%"))
        .stdout(predicate::str::contains("Morning (t1): 1/4 booked, 25%"))
        .stdout(predicate::str::contains("Afternoon (t2): 1/1 booked, 100%"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Settings layering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slot_minutes_flag_changes_grid() {
    let json = json_stdout(slots().args([
        "grid",
        "-i",
        schedule_path(),
        "--timeslot",
        "t1",
        "--slot-minutes",
        "60",
        "--json",
    ]));
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[test]
fn config_file_then_env_then_flag() {
    let base = [
        "grid",
        "-i",
        schedule_path(),
        "--timeslot",
        "t1",
        "--config",
        hourly_config_path(),
        "--json",
    ];

    let from_file = json_stdout(slots().args(base));
    assert_eq!(from_file.as_array().unwrap().len(), 2);

    let from_env = json_stdout(slots().env("SLOTS_SLOT_MINUTES", "120").args(base));
    assert_eq!(from_env.as_array().unwrap().len(), 1);

    let from_flag = json_stdout(
        slots()
            .env("SLOTS_SLOT_MINUTES", "120")
            .args(base)
            .args(["--slot-minutes", "30"]),
    );
    assert_eq!(from_flag.as_array().unwrap().len(), 4);
}

// ─────────────────────────────────────────────────────────────────────────────
// conflicts / pick
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_reports_double_booking() {
    slots()
        .args(["conflicts", "-i", schedule_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "t2: 'Hiring Panel' [w2] overlaps 'Office Hours' [w3] by 30 min",
        ));
}

#[test]
fn pick_rejects_range_over_booking() {
    slots()
        .args(["pick", "-i", schedule_path(), "--timeslot", "t1", "--click", "3", "--click", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("click 0: The selected range includes a booked slot"))
        .stdout(predicate::str::contains("Selected 1 slot(s): start 10:30, 30 min"));
}

#[test]
fn pick_json_output_matches_form_contract() {
    let json = json_stdout(slots().args([
        "pick", "-i", schedule_path(), "--timeslot", "t1", "--click", "0", "--json",
    ]));
    assert_eq!(json["selection"]["kind"], "single");
    assert_eq!(json["selection"]["index"], 0);
    assert_eq!(json["output"]["scheduledStartTime"], "2026-03-16T09:00:00Z");
    assert_eq!(json["output"]["duration"], 30);
}

#[test]
fn pick_without_clicks_selects_nothing() {
    slots()
        .args(["pick", "-i", schedule_path(), "--timeslot", "t2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing selected."));
}

// ─────────────────────────────────────────────────────────────────────────────
// Error handling
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unknown_timeslot_fails() {
    slots()
        .args(["resolve", "-i", schedule_path(), "--timeslot", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timeslot: 'nope'"));
}

#[test]
fn unknown_time_zone_fails() {
    slots()
        .args(["grid", "-i", schedule_path(), "--tz", "Mars/Olympus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown time zone"));
}

#[test]
fn zero_slot_minutes_fails() {
    slots()
        .args(["grid", "-i", schedule_path(), "--slot-minutes", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn missing_input_file_fails() {
    slots()
        .args(["grid", "-i", "/nonexistent/schedule.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn webinar_without_timeslot_fails() {
    let input = r#"{"timeslots":[],"webinars":[{"id":"w9","title":"Lost","scheduledStartTime":"2026-03-16T09:00:00Z","duration":30}]}"#;
    slots()
        .arg("stats")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load schedule"));
}
