//! WASM bindings for slot-engine.
//!
//! Exposes slot grids, occupancy resolution, the range picker, and
//! utilization stats to the JavaScript front end via `wasm-bindgen`. Every
//! complex value crosses the boundary as a JSON string: timeslots and webinars
//! go in exactly as the providers serve them (camelCase, ISO 8601 strings,
//! flat `timeslotId` or nested `timeslot.id`), and candidate slots, stats, and
//! picker state come back as camelCase JSON.
//!
//! The picker is stateless on this side. JS keeps the state JSON returned by
//! `pickerInit` / `pickerUpdate` and passes it back with the next message.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/slot-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use slot_engine::model::{
    normalize_timeslots, normalize_webinars, Timeslot, TimeslotRecord, Webinar, WebinarRecord,
};
use slot_engine::selection::{PickerMsg, PickerState};
use slot_engine::{interval, occupancy, stats, SlotDuration};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// JSON plumbing
// ---------------------------------------------------------------------------

type BindingResult<T> = Result<T, String>;

fn to_js(err: String) -> JsValue {
    JsValue::from_str(&err)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> BindingResult<String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn parse_timeslot(json: &str) -> BindingResult<Timeslot> {
    let record: TimeslotRecord =
        serde_json::from_str(json).map_err(|e| format!("Invalid timeslot JSON: {}", e))?;
    record.normalize().map_err(|e| e.to_string())
}

fn parse_timeslots(json: &str) -> BindingResult<Vec<Timeslot>> {
    let records: Vec<TimeslotRecord> =
        serde_json::from_str(json).map_err(|e| format!("Invalid timeslots JSON: {}", e))?;
    normalize_timeslots(records).map_err(|e| e.to_string())
}

fn parse_webinars(json: &str) -> BindingResult<Vec<Webinar>> {
    let records: Vec<WebinarRecord> =
        serde_json::from_str(json).map_err(|e| format!("Invalid webinars JSON: {}", e))?;
    normalize_webinars(records).map_err(|e| e.to_string())
}

/// `None` means the 30-minute platform default.
fn slot_duration(minutes: Option<u32>) -> BindingResult<SlotDuration> {
    minutes
        .map_or(Ok(SlotDuration::default()), SlotDuration::minutes)
        .map_err(|e| e.to_string())
}

fn parse_now(now: Option<&str>) -> BindingResult<DateTime<Utc>> {
    match now {
        Some(s) => interval::parse_instant(s).map_err(|e| e.to_string()),
        None => Ok(Utc::now()),
    }
}

// ---------------------------------------------------------------------------
// Plain-Rust implementations (testable off-wasm)
// ---------------------------------------------------------------------------

fn generate_slots_impl(timeslot_json: &str, slot_minutes: Option<u32>) -> BindingResult<String> {
    let timeslot = parse_timeslot(timeslot_json)?;
    let slot = slot_duration(slot_minutes)?;
    to_json(&slot_engine::generate_slots(&timeslot, slot))
}

fn resolve_occupancy_impl(
    timeslot_json: &str,
    webinars_json: &str,
    slot_minutes: Option<u32>,
) -> BindingResult<String> {
    let timeslot = parse_timeslot(timeslot_json)?;
    let webinars = parse_webinars(webinars_json)?;
    let slot = slot_duration(slot_minutes)?;
    to_json(&occupancy::resolve_timeslot(&timeslot, &webinars, slot))
}

fn resolve_all_impl(
    timeslots_json: &str,
    webinars_json: &str,
    slot_minutes: Option<u32>,
) -> BindingResult<String> {
    let timeslots = parse_timeslots(timeslots_json)?;
    let webinars = parse_webinars(webinars_json)?;
    let slot = slot_duration(slot_minutes)?;
    to_json(&occupancy::resolve_all(&timeslots, &webinars, slot))
}

fn compute_stats_impl(
    timeslots_json: &str,
    webinars_json: &str,
    slot_minutes: Option<u32>,
    now: Option<&str>,
) -> BindingResult<String> {
    let timeslots = parse_timeslots(timeslots_json)?;
    let webinars = parse_webinars(webinars_json)?;
    let slot = slot_duration(slot_minutes)?;
    let now = parse_now(now)?;
    to_json(&stats::compute_stats_at(&timeslots, &webinars, slot, now))
}

fn timeslot_summaries_impl(
    timeslots_json: &str,
    webinars_json: &str,
    slot_minutes: Option<u32>,
) -> BindingResult<String> {
    let timeslots = parse_timeslots(timeslots_json)?;
    let webinars = parse_webinars(webinars_json)?;
    let slot = slot_duration(slot_minutes)?;
    to_json(&stats::timeslot_summaries(&timeslots, &webinars, slot))
}

fn find_booking_conflicts_impl(webinars_json: &str) -> BindingResult<String> {
    let webinars = parse_webinars(webinars_json)?;
    to_json(&occupancy::find_booking_conflicts(&webinars))
}

fn unplaced_bookings_impl(timeslot_json: &str, webinars_json: &str) -> BindingResult<String> {
    let timeslot = parse_timeslot(timeslot_json)?;
    let webinars = parse_webinars(webinars_json)?;
    to_json(&occupancy::unplaced_bookings(&timeslot, &webinars))
}

fn picker_init_impl(
    timeslot_json: Option<&str>,
    webinars_json: &str,
    slot_minutes: Option<u32>,
) -> BindingResult<String> {
    let timeslot = timeslot_json.map(parse_timeslot).transpose()?;
    let webinars = parse_webinars(webinars_json)?;
    let slot = slot_duration(slot_minutes)?;
    to_json(&PickerState::for_timeslot(timeslot.as_ref(), &webinars, slot))
}

fn parse_picker(state_json: &str) -> BindingResult<PickerState> {
    serde_json::from_str(state_json).map_err(|e| format!("Invalid picker state JSON: {}", e))
}

fn picker_update_impl(state_json: &str, msg_json: &str) -> BindingResult<String> {
    let state = parse_picker(state_json)?;
    let msg: PickerMsg =
        serde_json::from_str(msg_json).map_err(|e| format!("Invalid picker message JSON: {}", e))?;
    to_json(&state.update(msg))
}

fn picker_preview_impl(state_json: &str) -> BindingResult<String> {
    let state = parse_picker(state_json)?;
    to_json(&state.preview())
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// Cut one timeslot into its grid of available cells.
///
/// `timeslot_json` is a single timeslot record. `slot_minutes` defaults to 30.
/// Returns a JSON array of candidate slots.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(timeslot_json: &str, slot_minutes: Option<u32>) -> Result<String, JsValue> {
    generate_slots_impl(timeslot_json, slot_minutes).map_err(to_js)
}

/// Resolve one timeslot's bookings into grouped and available slots.
#[wasm_bindgen(js_name = "resolveOccupancy")]
pub fn resolve_occupancy(
    timeslot_json: &str,
    webinars_json: &str,
    slot_minutes: Option<u32>,
) -> Result<String, JsValue> {
    resolve_occupancy_impl(timeslot_json, webinars_json, slot_minutes).map_err(to_js)
}

/// Resolve every timeslot and return all slots ordered by start time.
#[wasm_bindgen(js_name = "resolveAll")]
pub fn resolve_all(
    timeslots_json: &str,
    webinars_json: &str,
    slot_minutes: Option<u32>,
) -> Result<String, JsValue> {
    resolve_all_impl(timeslots_json, webinars_json, slot_minutes).map_err(to_js)
}

/// Dashboard statistics. `now` (ISO 8601) defaults to the current time.
#[wasm_bindgen(js_name = "computeStats")]
pub fn compute_stats(
    timeslots_json: &str,
    webinars_json: &str,
    slot_minutes: Option<u32>,
    now: Option<String>,
) -> Result<String, JsValue> {
    compute_stats_impl(timeslots_json, webinars_json, slot_minutes, now.as_deref()).map_err(to_js)
}

/// Per-timeslot counts for summary cards.
#[wasm_bindgen(js_name = "timeslotSummaries")]
pub fn timeslot_summaries(
    timeslots_json: &str,
    webinars_json: &str,
    slot_minutes: Option<u32>,
) -> Result<String, JsValue> {
    timeslot_summaries_impl(timeslots_json, webinars_json, slot_minutes).map_err(to_js)
}

/// Pairwise double-bookings within the same timeslot.
#[wasm_bindgen(js_name = "findBookingConflicts")]
pub fn find_booking_conflicts(webinars_json: &str) -> Result<String, JsValue> {
    find_booking_conflicts_impl(webinars_json).map_err(to_js)
}

/// Webinars of the timeslot that are scheduled outside its window.
#[wasm_bindgen(js_name = "unplacedBookings")]
pub fn unplaced_bookings(timeslot_json: &str, webinars_json: &str) -> Result<String, JsValue> {
    unplaced_bookings_impl(timeslot_json, webinars_json).map_err(to_js)
}

/// Fresh picker state for a timeslot (or none yet). Emits no output.
#[wasm_bindgen(js_name = "pickerInit")]
pub fn picker_init(
    timeslot_json: Option<String>,
    webinars_json: &str,
    slot_minutes: Option<u32>,
) -> Result<String, JsValue> {
    picker_init_impl(timeslot_json.as_deref(), webinars_json, slot_minutes).map_err(to_js)
}

/// Apply one picker message.
///
/// `msg_json` is `{"type":"click","payload":3}`, `{"type":"hover","payload":null}`,
/// `{"type":"clear"}` or `{"type":"timeslotChanged","payload":{"cells":[...]}}`.
/// Returns `{ state, warning?, output }`.
#[wasm_bindgen(js_name = "pickerUpdate")]
pub fn picker_update(state_json: &str, msg_json: &str) -> Result<String, JsValue> {
    picker_update_impl(state_json, msg_json).map_err(to_js)
}

/// What clicking the hovered cell would select, or `null`.
#[wasm_bindgen(js_name = "pickerPreview")]
pub fn picker_preview(state_json: &str) -> Result<String, JsValue> {
    picker_preview_impl(state_json).map_err(to_js)
}
