//! Plain-text and JSON views of a picker, used by the `rangepick` binary.
//!
//! Each cell is four columns wide: `[dd]` for a cursor endpoint, `(dd)` inside the
//! range, `~dd ` for dates outside range and ` dd ` otherwise.

use anyhow::{Context, Result};
use chrono::Weekday;
use serde::Serialize;

use crate::calendar::{CalendarDate, MonthMatrix};
use crate::modifiers::{ModifierMap, ModifierSet};
use crate::navigator::VisibleWindow;
use crate::picker::DatePicker;

const EMPTY_CELL: &str = "    ";

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

/// Four-column text for one cell.
pub fn format_cell(day: CalendarDate, flags: ModifierSet) -> String {
    if flags.cursor {
        format!("[{:>2}]", day.day())
    } else if flags.range {
        format!("({:>2})", day.day())
    } else if flags.disabled {
        format!("~{:>2} ", day.day())
    } else {
        format!(" {:>2} ", day.day())
    }
}

/// Render one month grid, asking `cell_state` for the flags of each date.
pub fn render_month(matrix: &MonthMatrix, cell_state: impl Fn(CalendarDate) -> ModifierSet) -> String {
    let mut out = String::new();
    let month = matrix.month().naive();
    out.push_str(&format!("{:^28}\n", month.format("%B %Y").to_string()));

    for weekday in matrix.week_start().weekdays() {
        out.push_str(&format!(" {} ", weekday_label(weekday)));
    }
    out.push('\n');

    for week in matrix.weeks() {
        let line: String = week
            .iter()
            .map(|slot| match slot {
                Some(day) => format_cell(*day, cell_state(*day)),
                None => EMPTY_CELL.to_string(),
            })
            .collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Render every visible month of `picker`, separated by blank lines.
pub fn render_picker(picker: &DatePicker) -> String {
    picker
        .visible_matrices()
        .iter()
        .map(|matrix| render_month(matrix, |day| picker.cell_state(day)))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Serializable state of a picker.
#[derive(Debug, Serialize)]
pub struct PickerSnapshot<'a> {
    pub today: CalendarDate,
    pub pick: &'static str,
    pub start_date: Option<CalendarDate>,
    pub end_date: Option<CalendarDate>,
    pub window: &'a VisibleWindow,
    pub modifiers: &'a ModifierMap,
}

impl<'a> PickerSnapshot<'a> {
    pub fn of(picker: &'a DatePicker) -> Self {
        let selection = picker.selection();
        Self {
            today: picker.today(),
            pick: selection.mode().as_str(),
            start_date: selection.start_date(),
            end_date: selection.end_date(),
            window: picker.window(),
            modifiers: picker.modifiers(),
        }
    }
}

pub fn render_json(picker: &DatePicker) -> Result<String> {
    serde_json::to_string_pretty(&PickerSnapshot::of(picker))
        .context("Failed to serialize picker state")
}
