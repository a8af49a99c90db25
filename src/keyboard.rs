//! Keyboard movement between date cells.
//!
//! Key names follow DOM `KeyboardEvent.key` values. The focused cell is identified by
//! its `YYYY-MM-DD` date key; a key that cannot be parsed leaves focus where it is.

use crate::calendar::{CalendarDate, WeekStart};
use crate::navigator::NavigationDirection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
}

impl NavigationKey {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(NavigationKey::ArrowUp),
            "ArrowDown" => Some(NavigationKey::ArrowDown),
            "ArrowLeft" => Some(NavigationKey::ArrowLeft),
            "ArrowRight" => Some(NavigationKey::ArrowRight),
            "Home" => Some(NavigationKey::Home),
            "End" => Some(NavigationKey::End),
            "PageUp" => Some(NavigationKey::PageUp),
            "PageDown" => Some(NavigationKey::PageDown),
            _ => None,
        }
    }
}

/// What a key press asks the picker to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Move input focus to this date's cell.
    Focus(CalendarDate),
    /// Shift the visible window; focus follows once the shift is committed.
    Navigate(NavigationDirection),
}

/// Resolve a key press on the cell whose date key is `focused`.
pub fn key_action(key: NavigationKey, focused: &str, week_start: WeekStart) -> Option<KeyAction> {
    match key {
        NavigationKey::PageUp => return Some(KeyAction::Navigate(NavigationDirection::Prev)),
        NavigationKey::PageDown => return Some(KeyAction::Navigate(NavigationDirection::Next)),
        _ => {}
    }

    let current = match CalendarDate::parse(focused) {
        Ok(date) => date,
        Err(e) => {
            log_debug!("Ignoring key on cell without a valid date: {}", e);
            return None;
        }
    };

    let target = match key {
        NavigationKey::ArrowUp => current.add_weeks(-1),
        NavigationKey::ArrowDown => current.add_weeks(1),
        NavigationKey::ArrowLeft => current.add_days(-1),
        NavigationKey::ArrowRight => current.add_days(1),
        NavigationKey::Home => current.start_of_week(week_start),
        NavigationKey::End => current.end_of_week(week_start),
        NavigationKey::PageUp | NavigationKey::PageDown => return None,
    };

    Some(KeyAction::Focus(target))
}
