//! Calendar primitives: logical dates, week numbering and month grids.

pub mod date;
pub mod matrix;

pub use date::{CalendarDate, WeekNumber, WeekStart};
pub use matrix::{MonthMatrix, Week, build_month_matrix};
