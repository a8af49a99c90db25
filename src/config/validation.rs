//! Configuration validation functionality.
//!
//! Rejects values outside hard limits and date combinations the picker cannot open
//! with. An inverted `date_from`/`date_to` pair is accepted since the selection
//! normalizes it.

use anyhow::Result;

use super::{Config, parse_date_field};
use crate::common::constants::*;
use crate::selection::PickMode;

pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(months) = config.number_of_months
        && !(MINIMUM_NUMBER_OF_MONTHS..=MAXIMUM_NUMBER_OF_MONTHS).contains(&months)
    {
        anyhow::bail!(
            "number_of_months ({}) must be between {} and {}",
            months,
            MINIMUM_NUMBER_OF_MONTHS,
            MAXIMUM_NUMBER_OF_MONTHS
        );
    }

    if let Some(debounce) = config.navigation_debounce_ms
        && !(MINIMUM_NAVIGATION_DEBOUNCE_MS..=MAXIMUM_NAVIGATION_DEBOUNCE_MS).contains(&debounce)
    {
        anyhow::bail!(
            "navigation_debounce_ms ({} ms) must be between {} and {} milliseconds",
            debounce,
            MINIMUM_NAVIGATION_DEBOUNCE_MS,
            MAXIMUM_NAVIGATION_DEBOUNCE_MS
        );
    }

    if let Some(throttle) = config.hover_throttle_ms
        && !(MINIMUM_HOVER_THROTTLE_MS..=MAXIMUM_HOVER_THROTTLE_MS).contains(&throttle)
    {
        anyhow::bail!(
            "hover_throttle_ms ({} ms) must be between {} and {} milliseconds",
            throttle,
            MINIMUM_HOVER_THROTTLE_MS,
            MAXIMUM_HOVER_THROTTLE_MS
        );
    }

    // Parse every date so malformed values are reported with their field name
    let (date_from, date_to) = config.initial_dates()?;
    let min_date = parse_date_field(config.min_date.as_deref(), "min_date")?;
    let max_date = parse_date_field(config.max_date.as_deref(), "max_date")?;

    if let (Some(min), Some(max)) = (min_date, max_date)
        && max < min
    {
        anyhow::bail!(
            "min_date ({}) must not be after max_date ({})",
            min,
            max
        );
    }

    if date_to.is_some() && date_from.is_none() && config.pick_mode() == PickMode::Single {
        anyhow::bail!("date_to requires date_from in single pick mode");
    }

    if date_to.is_some() && config.pick_mode() == PickMode::Single {
        log_warning!("date_to is ignored in single pick mode");
    }

    Ok(())
}
