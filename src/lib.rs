//! # rangepick
//!
//! Date arithmetic and selection state for calendar and date-range pickers.
//!
//! The library is the pure core behind a picker widget. It has no rendering of its own
//! beyond the plain-text views the `rangepick` binary prints.
//!
//! ## Architecture
//!
//! - **Calendar**: `calendar` builds week-aligned month grids under Sunday-start
//!   (locale) or Monday-start (ISO) week numbering
//! - **Modifiers**: `modifiers` maps dates to the flags a renderer draws (cursor, range,
//!   hover, disabled) and merges spans into snapshots
//! - **Selection**: `selection` is the start/end state machine for single and range picks
//! - **Navigation**: `navigator` owns the sliding window of months and its debounced moves
//! - **Controller**: `picker::DatePicker` composes the above, owns every timer and
//!   exposes the operations a renderer calls
//! - **Infrastructure**: `time_source`, `timers`, `config`, logging macros and the CLI

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod calendar;
pub mod config;
pub mod keyboard;
pub mod modifiers;
pub mod navigator;
pub mod outside_range;
pub mod picker;
pub mod render;
pub mod selection;
pub mod time_source;
pub mod timers;

pub use calendar::{CalendarDate, MonthMatrix, WeekStart, build_month_matrix};
pub use modifiers::{ModifierFlag, ModifierMap, ModifierSet, merge_modifiers};
pub use navigator::{NavigationDirection, Navigator, VisibleWindow, navigate};
pub use outside_range::{DateBounds, NeverOutside, OutsideRange};
pub use picker::{DatePicker, PickerOptions, PollOutcome};
pub use selection::{Cursor, PickMode, SelectionState};
