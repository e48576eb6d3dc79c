//! Contiguous range picker over one timeslot's grid cells.
//!
//! The picker is a pure state machine: [`PickerState::update`] takes the
//! current state and a [`PickerMsg`] and returns the next state, an optional
//! user-facing warning, and the derived `{ scheduledStartTime, duration }`
//! the webinar form consumes. Nothing is mutated in place.
//!
//! The selection is always empty or a single ascending run of available
//! cells. Clicks that would break that (a booked cell, or a range spanning a
//! booked cell) leave the state untouched and come back as a [`PickerWarning`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SchedulingError};
use crate::interval::SlotDuration;
use crate::model::{Timeslot, Webinar};
use crate::occupancy;
use crate::slot::CandidateSlot;

/// Currently chosen cells, by grid index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Selection {
    #[default]
    Empty,
    Single {
        index: usize,
    },
    Range {
        first: usize,
        last: usize,
    },
}

impl Selection {
    /// The run `a..=b` in either order.
    pub fn span(a: usize, b: usize) -> Self {
        let (first, last) = (a.min(b), a.max(b));
        if first == last {
            Selection::Single { index: first }
        } else {
            Selection::Range { first, last }
        }
    }

    pub fn bounds(&self) -> Option<(usize, usize)> {
        match *self {
            Selection::Empty => None,
            Selection::Single { index } => Some((index, index)),
            Selection::Range { first, last } => Some((first, last)),
        }
    }

    pub fn len(&self) -> usize {
        self.bounds()
            .and_then(|(first, last)| last.checked_sub(first))
            .map_or(0, |span| span + 1)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Selection::Empty)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bounds()
            .is_some_and(|(first, last)| first <= index && index <= last)
    }

    pub fn indices(&self) -> Vec<usize> {
        self.bounds()
            .map_or_else(Vec::new, |(first, last)| (first..=last).collect())
    }
}

/// Input events driving the picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum PickerMsg {
    /// The user clicked the cell at this grid index.
    Click(usize),
    /// The pointer moved onto a cell, or off the grid.
    Hover(Option<usize>),
    /// Drop the whole selection.
    Clear,
    /// The owning timeslot changed; replaces the grid and resets the selection.
    TimeslotChanged { cells: Vec<CandidateSlot> },
}

/// Recoverable, user-facing reasons a click was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PickerWarning {
    /// The clicked cell is already booked.
    SlotBooked { index: usize },
    /// Extending to the clicked cell would swallow a booked cell.
    RangeConflict {
        first: usize,
        last: usize,
        blocked: usize,
    },
    /// No cell exists at this index.
    UnknownSlot { index: usize },
}

impl fmt::Display for PickerWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerWarning::SlotBooked { .. } => write!(f, "This slot is already booked"),
            PickerWarning::RangeConflict { .. } => {
                write!(f, "The selected range includes a booked slot")
            }
            PickerWarning::UnknownSlot { index } => write!(f, "No slot at position {}", index),
        }
    }
}

/// Start and length picked for a webinar, as the submission form expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledRange {
    pub scheduled_start_time: DateTime<Utc>,
    /// Minutes.
    pub duration: u32,
}

/// What a click on the hovered cell would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverPreview {
    pub selection: Selection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<PickerWarning>,
}

/// Result of one [`PickerState::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickerUpdate {
    pub state: PickerState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<PickerWarning>,
    pub output: Option<ScheduledRange>,
}

/// Picker state as it round-trips through the front end.
///
/// Deserializing validates the selection against the grid, so a state edited
/// on the JS side cannot smuggle in a run over booked or missing cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPickerState")]
pub struct PickerState {
    pub cells: Vec<CandidateSlot>,
    pub selection: Selection,
    pub hover: Option<usize>,
    pub slot_duration: SlotDuration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPickerState {
    cells: Vec<CandidateSlot>,
    #[serde(default)]
    selection: Selection,
    #[serde(default)]
    hover: Option<usize>,
    #[serde(default)]
    slot_duration: SlotDuration,
}

impl TryFrom<RawPickerState> for PickerState {
    type Error = SchedulingError;

    fn try_from(raw: RawPickerState) -> Result<Self> {
        let state = PickerState {
            cells: raw.cells,
            selection: raw.selection,
            hover: raw.hover,
            slot_duration: raw.slot_duration,
        };
        state.validate()?;
        Ok(state)
    }
}

impl PickerState {
    /// A picker over `cells` with nothing selected.
    pub fn new(cells: Vec<CandidateSlot>, slot_duration: SlotDuration) -> Self {
        Self {
            cells,
            selection: Selection::Empty,
            hover: None,
            slot_duration,
        }
    }

    /// A picker over the occupancy-marked grid of `timeslot`.
    ///
    /// An absent timeslot gives an empty grid.
    pub fn for_timeslot(
        timeslot: Option<&Timeslot>,
        webinars: &[Webinar],
        slot_duration: SlotDuration,
    ) -> Self {
        let cells = timeslot.map_or_else(Vec::new, |ts| {
            occupancy::mark_cells(ts, webinars, slot_duration)
        });
        Self::new(cells, slot_duration)
    }

    /// Check that the selection is empty or one ascending run of free cells
    /// inside the grid.
    pub fn validate(&self) -> Result<()> {
        if let Selection::Range { first, last } = self.selection {
            if first >= last {
                return invalid_state(format!("range {}..={} is not ascending", first, last));
            }
        }
        let Some((first, last)) = self.selection.bounds() else {
            return Ok(());
        };
        if last >= self.cells.len() {
            return invalid_state(format!(
                "selection {}..={} runs past a grid of {} cells",
                first,
                last,
                self.cells.len()
            ));
        }
        match (first..=last).find(|&i| self.cells[i].is_occupied) {
            Some(booked) => invalid_state(format!("selection covers booked cell {}", booked)),
            None => Ok(()),
        }
    }

    /// Apply one message and return the resulting state.
    pub fn update(&self, msg: PickerMsg) -> PickerUpdate {
        let mut next = self.clone();

        let warning = match msg {
            PickerMsg::Click(index) => match self.click(index) {
                Ok(selection) => {
                    next.selection = selection;
                    None
                }
                Err(warning) => Some(warning),
            },
            PickerMsg::Hover(index) => {
                next.hover = index;
                None
            }
            PickerMsg::Clear => {
                next.selection = Selection::Empty;
                None
            }
            PickerMsg::TimeslotChanged { cells } => {
                let slot_duration = cell_duration(&cells).unwrap_or(self.slot_duration);
                next = Self::new(cells, slot_duration);
                None
            }
        };

        if let Some(w) = &warning {
            tracing::warn!(warning = %w, "slot selection rejected");
        }

        let output = next.output();
        PickerUpdate {
            state: next,
            warning,
            output,
        }
    }

    /// The selection a click on `index` would produce.
    fn click(&self, index: usize) -> std::result::Result<Selection, PickerWarning> {
        let cell = self
            .cells
            .get(index)
            .ok_or(PickerWarning::UnknownSlot { index })?;
        if cell.is_occupied {
            return Err(PickerWarning::SlotBooked { index });
        }

        let Some((first, last)) = self.selection.bounds() else {
            return Ok(Selection::Single { index });
        };

        if index < first || index > last {
            let (lo, hi) = (index.min(first), index.max(last));
            let blocked = (lo..=hi).find(|&i| self.cells.get(i).map_or(true, |c| c.is_occupied));
            return match blocked {
                Some(blocked) => Err(PickerWarning::RangeConflict {
                    first: lo,
                    last: hi,
                    blocked,
                }),
                None => Ok(Selection::span(lo, hi)),
            };
        }

        if first < last && index == first {
            Ok(Selection::span(first + 1, last))
        } else if first < last && index == last {
            Ok(Selection::span(first, last - 1))
        } else {
            Ok(Selection::Single { index })
        }
    }

    /// Derived `{ scheduledStartTime, duration }`, or `None` when nothing is selected.
    ///
    /// The duration spans the selected cells themselves, from the first cell's
    /// start to the last cell's end.
    pub fn output(&self) -> Option<ScheduledRange> {
        let (first, last) = self.selection.bounds()?;
        let start = self.cells.get(first)?.start;
        let end = self.cells.get(last)?.end;
        let duration = u32::try_from((end - start).num_minutes()).ok()?;
        Some(ScheduledRange {
            scheduled_start_time: start,
            duration,
        })
    }

    /// Preview of clicking the hovered cell, if any cell is hovered.
    pub fn preview(&self) -> Option<HoverPreview> {
        let index = self.hover?;
        Some(match self.click(index) {
            Ok(selection) => HoverPreview {
                selection,
                warning: None,
            },
            Err(warning) => HoverPreview {
                selection: self.selection,
                warning: Some(warning),
            },
        })
    }

    /// Selected cells in chronological order.
    pub fn selected_cells(&self) -> &[CandidateSlot] {
        match self.selection.bounds() {
            Some((first, last)) if first <= last && last < self.cells.len() => {
                &self.cells[first..=last]
            }
            _ => &[],
        }
    }
}

fn invalid_state(reason: String) -> Result<()> {
    Err(SchedulingError::InvalidPickerState(reason))
}

/// Slot length of a replacement grid, read off its first cell.
fn cell_duration(cells: &[CandidateSlot]) -> Option<SlotDuration> {
    let minutes = u32::try_from(cells.first()?.duration_minutes()).ok()?;
    SlotDuration::minutes(minutes).ok()
}

/// Guard used by the webinar form before submitting.
pub fn require_schedule(output: Option<&ScheduledRange>) -> Result<&ScheduledRange> {
    output.ok_or(SchedulingError::MissingSchedule)
}
