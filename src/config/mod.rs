//! Configuration for the picker: TOML file, defaults and validation.
//!
//! ## Configuration Sources
//!
//! 1. An explicit path given with `--config <path>` (must exist)
//! 2. **XDG_CONFIG_HOME**/rangepick/rangepick.toml (optional)
//!
//! A missing default file is not an error: every field falls back to its default.
//!
//! ## Configuration Structure
//!
//! ```toml
//! pick = "range"               # "single" or "range"
//! number_of_months = 2         # Months shown side by side (1-12)
//! week_start = "sunday"        # "sunday" (locale weeks) or "monday" (ISO weeks)
//! date_from = "2024-01-15"     # Initial start date (YYYY-MM-DD)
//! date_to = "2024-02-20"       # Initial end date (YYYY-MM-DD)
//! min_date = "2023-01-01"      # Earlier dates are outside range
//! max_date = "2025-12-31"      # Later dates are outside range
//! disable_future = false       # Dates after today are outside range
//! navigation_debounce_ms = 250 # Quiet period before a navigation commits (50-2000)ms
//! hover_throttle_ms = 16       # Minimum spacing between hover previews (1-1000)ms
//! ```
//!
//! Dates are kept as strings in the file representation and parsed during validation,
//! so a malformed date is reported with the field name it came from.

pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use crate::calendar::{CalendarDate, WeekStart};
use crate::common::constants::*;
use crate::outside_range::DateBounds;
use crate::picker::PickerOptions;
use crate::selection::PickMode;

pub use loading::{get_config_path, load, load_from_path};

/// Picker configuration as read from `rangepick.toml`.
///
/// Every field is optional; accessors apply the defaults from `common::constants`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub pick: Option<PickMode>,
    pub number_of_months: Option<usize>,
    pub week_start: Option<WeekStart>,
    pub date_from: Option<String>, // YYYY-MM-DD
    pub date_to: Option<String>,   // YYYY-MM-DD
    pub min_date: Option<String>,  // YYYY-MM-DD
    pub max_date: Option<String>,  // YYYY-MM-DD
    pub disable_future: Option<bool>,
    pub navigation_debounce_ms: Option<u64>,
    pub hover_throttle_ms: Option<u64>,
}

/// Parse an optional date field, naming the field in the error.
pub(crate) fn parse_date_field(value: Option<&str>, field: &str) -> Result<Option<CalendarDate>> {
    value
        .map(|s| CalendarDate::parse(s).with_context(|| format!("Invalid {field}")))
        .transpose()
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Load from path using the module's load_from_path function
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        load_from_path(path)
    }

    /// Get configuration path using the module's get_config_path function
    pub fn get_config_path() -> Result<PathBuf> {
        get_config_path()
    }

    pub fn pick_mode(&self) -> PickMode {
        self.pick.unwrap_or(DEFAULT_PICK_MODE)
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start.unwrap_or(DEFAULT_WEEK_START)
    }

    /// Picker options with defaults applied.
    pub fn picker_options(&self) -> PickerOptions {
        PickerOptions {
            pick: self.pick_mode(),
            number_of_months: self.number_of_months.unwrap_or(DEFAULT_NUMBER_OF_MONTHS),
            week_start: self.week_start(),
            navigation_debounce: StdDuration::from_millis(
                self.navigation_debounce_ms
                    .unwrap_or(DEFAULT_NAVIGATION_DEBOUNCE_MS),
            ),
            hover_throttle: StdDuration::from_millis(
                self.hover_throttle_ms.unwrap_or(DEFAULT_HOVER_THROTTLE_MS),
            ),
        }
    }

    /// Selectable range described by `min_date`, `max_date` and `disable_future`.
    pub fn bounds(&self) -> Result<DateBounds> {
        Ok(DateBounds {
            min: parse_date_field(self.min_date.as_deref(), "min_date")?,
            max: parse_date_field(self.max_date.as_deref(), "max_date")?,
            disable_future: self.disable_future.unwrap_or(DEFAULT_DISABLE_FUTURE),
        })
    }

    /// Initial `(date_from, date_to)`.
    pub fn initial_dates(&self) -> Result<(Option<CalendarDate>, Option<CalendarDate>)> {
        Ok((
            parse_date_field(self.date_from.as_deref(), "date_from")?,
            parse_date_field(self.date_to.as_deref(), "date_to")?,
        ))
    }

    /// Log the effective configuration.
    pub fn log_config(&self, source: Option<&PathBuf>) {
        match source {
            Some(path) => log_block_start!("Loaded configuration from {}", path.display()),
            None => log_block_start!("No configuration file found, using defaults"),
        }

        let options = self.picker_options();
        log_indented!("Pick mode: {}", options.pick.as_str());
        log_indented!("Months shown: {}", options.number_of_months);
        log_indented!("Week start: {}", options.week_start.as_str());

        if let Some(from) = &self.date_from {
            log_indented!("Initial start: {}", from);
        }
        if let Some(to) = &self.date_to {
            log_indented!("Initial end: {}", to);
        }

        match (&self.min_date, &self.max_date) {
            (None, None) => {}
            (min, max) => log_indented!(
                "Selectable: {} .. {}",
                min.as_deref().unwrap_or("-"),
                max.as_deref().unwrap_or("-")
            ),
        }
        if self.disable_future.unwrap_or(DEFAULT_DISABLE_FUTURE) {
            log_indented!("Future dates disabled");
        }

        log_indented!(
            "Navigation debounce: {}ms, hover throttle: {}ms",
            options.navigation_debounce.as_millis(),
            options.hover_throttle.as_millis()
        );
    }
}
