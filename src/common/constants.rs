//! Default values and hard limits shared across the crate.

use crate::calendar::WeekStart;
use crate::selection::PickMode;

// # Application
pub const APP_NAME: &str = "rangepick";
pub const CONFIG_FILE_NAME: &str = "rangepick.toml";

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

// # Picker defaults
pub const DEFAULT_PICK_MODE: PickMode = PickMode::Range;
pub const DEFAULT_NUMBER_OF_MONTHS: usize = 2;
pub const DEFAULT_WEEK_START: WeekStart = WeekStart::Sunday;
pub const DEFAULT_DISABLE_FUTURE: bool = false;

/// Visible months plus this many buffer months make up the sliding window.
pub const WINDOW_BUFFER_MONTHS: usize = 2;

pub const MINIMUM_NUMBER_OF_MONTHS: usize = 1;
pub const MAXIMUM_NUMBER_OF_MONTHS: usize = 12;

// # Timing (milliseconds)
pub const DEFAULT_NAVIGATION_DEBOUNCE_MS: u64 = 250;
pub const MINIMUM_NAVIGATION_DEBOUNCE_MS: u64 = 50;
pub const MAXIMUM_NAVIGATION_DEBOUNCE_MS: u64 = 2000;

pub const DEFAULT_HOVER_THROTTLE_MS: u64 = 16;
pub const MINIMUM_HOVER_THROTTLE_MS: u64 = 1;
pub const MAXIMUM_HOVER_THROTTLE_MS: u64 = 1000;

// # Bounded searches
/// Upper bound on months walked back while looking for an in-range initial month.
pub const MAX_MONTH_SEARCH: u32 = 1200;

/// Upper bound on the repeat count of a single `--next`/`--prev` flag.
pub const MAXIMUM_NAVIGATION_REPEAT: u32 = MAXIMUM_NUMBER_OF_MONTHS as u32 * 100;

/// Date key format used for modifier lookups and focus requests.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

#[cfg(test)]
pub mod test_constants {
    pub const TEST_RANGE_FROM: &str = "2024-01-15";
    pub const TEST_RANGE_TO: &str = "2024-02-20";
    pub const TEST_INVERTED_START: &str = "2024-03-10";
    pub const TEST_INVERTED_END: &str = "2024-03-05";
}
