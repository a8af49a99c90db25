//! Week-aligned month grids.
//!
//! A month is laid out as rows of seven slots. Each row is a week of the chosen
//! week-numbering scheme; slots outside the target month stay empty. A day's row is
//! the number of whole weeks between the start of the first week and that day, which
//! equals its week-number delta from the first of the month without wrapping at the
//! end of a week-numbering year.

use serde::Serialize;

use super::date::{CalendarDate, WeekStart};

/// One row of a month grid.
pub type Week = [Option<CalendarDate>; 7];

const EMPTY_WEEK: Week = [None; 7];

/// A week-aligned grid of the days of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthMatrix {
    month: CalendarDate,
    week_start: WeekStart,
    weeks: Vec<Week>,
}

impl MonthMatrix {
    /// First day of the month this grid displays.
    pub fn month(&self) -> CalendarDate {
        self.month
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn row_count(&self) -> usize {
        self.weeks.len()
    }

    /// All placed dates in row-major order.
    pub fn dates(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.weeks.iter().flatten().flatten().copied()
    }

    /// Row and column of a date, if it is part of this grid.
    pub fn position_of(&self, date: CalendarDate) -> Option<(usize, usize)> {
        self.weeks.iter().enumerate().find_map(|(row, week)| {
            week.iter()
                .position(|slot| *slot == Some(date))
                .map(|column| (row, column))
        })
    }
}

/// Build the grid for the month containing `anchor`. Only year and month of the
/// anchor are used.
pub fn build_month_matrix(anchor: CalendarDate, week_start: WeekStart) -> MonthMatrix {
    let start = anchor.start_of_month();
    let end = anchor.end_of_month();

    // Days before the 1st in its week, so row arithmetic never leaves the month
    let lead = week_start.column(start);
    let last_offset = start.days_until(end) as usize;
    let mut weeks = vec![EMPTY_WEEK; (lead + last_offset) / 7 + 1];

    for offset in 0..=last_offset {
        let date = start.add_days(offset as i64);
        weeks[(lead + offset) / 7][week_start.column(date)] = Some(date);
    }

    MonthMatrix {
        month: start,
        week_start,
        weeks,
    }
}
