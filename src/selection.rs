//! Start/end selection state for single-date and range pickers.
//!
//! In range mode the state alternates between awaiting a start and awaiting an end.
//! The pair is stored ordered: picking an end that precedes the start swaps the two,
//! so `start_date <= end_date` holds whenever both are set. In single mode every click
//! replaces the start date and the end date stays unset.
//!
//! Every transition returns the modifier map describing the new selection; hover
//! previews compute a map with the same ordering rules without touching the state.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::modifiers::{ModifierFlag, ModifierMap};
use crate::outside_range::OutsideRange;

/// Whether the picker selects one date or a start/end range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickMode {
    Single,
    #[default]
    Range,
}

impl PickMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickMode::Single => "single",
            PickMode::Range => "range",
        }
    }
}

/// Which endpoint the next click writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Awaiting the start of a new selection.
    #[default]
    Start,
    /// Awaiting the end of a range whose start is set.
    End,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    mode: PickMode,
    cursor: Cursor,
    start_date: Option<CalendarDate>,
    end_date: Option<CalendarDate>,
}

/// Order two endpoints so the earlier one comes first.
fn ordered(a: CalendarDate, b: CalendarDate) -> (CalendarDate, CalendarDate) {
    if b.is_before(a) { (b, a) } else { (a, b) }
}

impl SelectionState {
    /// Create a selection from initial dates, normalizing them for the mode.
    pub fn new(
        mode: PickMode,
        date_from: Option<CalendarDate>,
        date_to: Option<CalendarDate>,
    ) -> Self {
        let (start_date, end_date) = match (mode, date_from, date_to) {
            (PickMode::Single, from, _) => (from, None),
            (PickMode::Range, Some(from), Some(to)) => {
                let (start, end) = ordered(from, to);
                (Some(start), Some(end))
            }
            (PickMode::Range, from, to) => (from, to),
        };

        Self {
            mode,
            cursor: Cursor::Start,
            start_date,
            end_date,
        }
    }

    pub fn mode(&self) -> PickMode {
        self.mode
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn start_date(&self) -> Option<CalendarDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<CalendarDate> {
        self.end_date
    }

    pub fn is_awaiting_end(&self) -> bool {
        self.mode == PickMode::Range && self.cursor == Cursor::End
    }

    /// Put the cursor back to awaiting a start.
    pub fn reset_cursor(&mut self) {
        self.cursor = Cursor::Start;
    }

    /// Switch pick mode. Leaving range mode drops the end date.
    pub fn set_mode(&mut self, mode: PickMode) {
        self.mode = mode;
        self.cursor = Cursor::Start;
        if mode == PickMode::Single {
            self.end_date = None;
        }
    }

    /// The full modifier map for the current selection.
    ///
    /// A complete range yields `cursor` on both endpoints and `range` across the span;
    /// a lone endpoint yields just its `cursor`.
    pub fn modifiers(&self) -> ModifierMap {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => ModifierMap::new()
                .with(ModifierFlag::Range, Some(start), Some(end))
                .with(ModifierFlag::Cursor, Some(start), None)
                .with(ModifierFlag::Cursor, Some(end), None),
            (start, end) => ModifierMap::new().with(ModifierFlag::Cursor, start, end),
        }
    }

    /// Apply a click on `day` and return the resulting modifier map.
    pub fn click_day(&mut self, day: CalendarDate) -> ModifierMap {
        match (self.mode, self.cursor) {
            (PickMode::Single, _) => {
                self.start_date = Some(day);
                self.end_date = None;
            }
            (PickMode::Range, Cursor::Start) => {
                self.start_date = Some(day);
                self.end_date = None;
                self.cursor = Cursor::End;
            }
            (PickMode::Range, Cursor::End) => {
                let (start, end) = ordered(self.start_date.unwrap_or(day), day);
                self.start_date = Some(start);
                self.end_date = Some(end);
                self.cursor = Cursor::Start;
            }
        }

        self.modifiers()
    }

    /// Preview map for hovering `day` while an end date is awaited.
    ///
    /// Returns `None` when no preview applies (single mode, awaiting a start, or no
    /// start date yet). The selection itself is not changed.
    pub fn preview(&self, day: CalendarDate) -> Option<ModifierMap> {
        if !self.is_awaiting_end() {
            return None;
        }
        let start = self.start_date?;
        let (from, to) = ordered(start, day);

        Some(
            ModifierMap::new()
                .with(ModifierFlag::Range, Some(from), Some(to))
                .with(ModifierFlag::Cursor, Some(start), None),
        )
    }

    /// Select the whole month containing `month`.
    ///
    /// Only allowed in range mode and when the first of the month is inside range.
    /// The end date starts at the last of the month and is pulled back one day at a
    /// time while the predicate rejects it. The walk stops at the first of the month at
    /// the latest, which is already known to be inside range, so it takes at most one
    /// step per day of the month.
    ///
    /// A completed month selection always leaves the cursor on [`Cursor::Start`].
    pub fn select_month(
        &mut self,
        month: CalendarDate,
        predicate: &dyn OutsideRange,
        base: CalendarDate,
    ) -> Option<ModifierMap> {
        if self.mode != PickMode::Range {
            log_debug!("Whole-month selection ignored outside range mode");
            return None;
        }

        let start = month.start_of_month();
        if predicate.is_outside_range(start, base) {
            log_debug!("Whole-month selection of {} rejected: month start outside range", start);
            return None;
        }

        let month_end = month.end_of_month();
        let mut end = month_end;
        while start.is_before(end) && predicate.is_outside_range(end, base) {
            end = end.add_days(-1);
        }
        if end != month_end {
            log_debug!("Whole-month end date clipped from {} to {}", month_end, end);
        }

        self.start_date = Some(start);
        self.end_date = Some(end);
        self.cursor = Cursor::Start;

        Some(self.modifiers())
    }
}
