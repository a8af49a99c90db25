//! The sliding window of visible months.
//!
//! A picker showing `n` months keeps `n + 2` consecutive month anchors: the visible
//! months plus one buffer month on each side that a renderer can slide in while a
//! navigation is pending. Navigating drops the anchor at one edge and adds a new one
//! at the other. Navigation requests are debounced, and only the last direction
//! requested within the quiet interval is committed.
//!
//! The window does no range validation of its own. Callers check
//! [`Navigator::can_navigate`] (or their own predicate) before requesting a move.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration as StdDuration;

use crate::calendar::{CalendarDate, WeekStart};
use crate::common::constants::{MAX_MONTH_SEARCH, WINDOW_BUFFER_MONTHS};
use crate::outside_range::OutsideRange;
use crate::timers::Debouncer;

/// Direction of a month navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationDirection {
    Prev,
    Next,
}

impl NavigationDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            NavigationDirection::Prev => "prev",
            NavigationDirection::Next => "next",
        }
    }
}

/// `number_of_months + 2` consecutive month anchors in ascending order.
///
/// Anchors are always the first day of their month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisibleWindow {
    anchors: Vec<CalendarDate>,
    number_of_months: usize,
}

impl VisibleWindow {
    /// Window whose last visible month contains `anchor`.
    pub fn ending_at(anchor: CalendarDate, number_of_months: usize) -> Self {
        let number_of_months = number_of_months.max(1);
        let first = anchor.start_of_month().add_months(-(number_of_months as i32));
        Self::from_first(first, number_of_months)
    }

    /// Window whose leading buffer month contains `first`.
    fn from_first(first: CalendarDate, number_of_months: usize) -> Self {
        let first = first.start_of_month();
        let anchors = (0..number_of_months + WINDOW_BUFFER_MONTHS)
            .map(|i| first.add_months(i as i32))
            .collect();
        Self {
            anchors,
            number_of_months,
        }
    }

    /// The window a picker opens with.
    ///
    /// The last visible month is the month of `date_to`, else `date_from`, else
    /// `today`, moved back one month at a time while its first day is outside range.
    /// The search gives up after `MAX_MONTH_SEARCH` months and keeps the starting
    /// month, so a predicate that rejects everything cannot stall the picker.
    pub fn initial(
        number_of_months: usize,
        date_from: Option<CalendarDate>,
        date_to: Option<CalendarDate>,
        today: CalendarDate,
        predicate: &dyn OutsideRange,
    ) -> Self {
        let base = date_to.or(date_from).unwrap_or(today).start_of_month();

        let mut anchor = base;
        let mut steps = 0;
        while predicate.is_outside_range(anchor, today) {
            if steps >= MAX_MONTH_SEARCH {
                log_debug!(
                    "No in-range month within {} months before {}, opening at {}",
                    MAX_MONTH_SEARCH,
                    base,
                    base
                );
                anchor = base;
                break;
            }
            anchor = anchor.add_months(-1);
            steps += 1;
        }

        Self::ending_at(anchor, number_of_months)
    }

    pub fn anchors(&self) -> &[CalendarDate] {
        &self.anchors
    }

    pub fn number_of_months(&self) -> usize {
        self.number_of_months
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Leading buffer month.
    pub fn first(&self) -> CalendarDate {
        self.anchors[0]
    }

    /// Trailing buffer month.
    pub fn last(&self) -> CalendarDate {
        self.anchors[self.anchors.len() - 1]
    }

    /// The months between the two buffer months.
    pub fn visible(&self) -> &[CalendarDate] {
        &self.anchors[1..self.anchors.len() - 1]
    }
}

/// Shift `window` by one month in `direction`.
pub fn navigate(window: &VisibleWindow, direction: NavigationDirection) -> VisibleWindow {
    let mut anchors = window.anchors.clone();

    match direction {
        NavigationDirection::Next => {
            let next = window.last().add_months(1);
            anchors.remove(0);
            anchors.push(next);
        }
        NavigationDirection::Prev => {
            let prev = window.first().add_months(-1);
            anchors.pop();
            anchors.insert(0, prev);
        }
    }

    let expected = window.number_of_months + WINDOW_BUFFER_MONTHS;
    anchors.truncate(expected);
    while anchors.len() < expected {
        let next = anchors
            .last()
            .map(|last| last.add_months(1))
            .unwrap_or_else(|| window.first());
        anchors.push(next);
    }

    VisibleWindow {
        anchors,
        number_of_months: window.number_of_months,
    }
}

/// Date to focus after a committed navigation.
///
/// Keeps the position of `today` within its month (same number of whole weeks from
/// the first of the month, same weekday) and transfers it to the last visible month.
pub fn focus_after_navigation(
    window: &VisibleWindow,
    today: CalendarDate,
    week_start: WeekStart,
) -> CalendarDate {
    let week_offset = today.start_of_month().weeks_until(today);
    let last_visible = window.anchors[window.anchors.len() - 2];

    last_visible
        .add_weeks(week_offset)
        .with_weekday(today.weekday(), week_start)
}

/// Owns the visible window and the debounced navigation request.
#[derive(Debug, Clone)]
pub struct Navigator {
    window: VisibleWindow,
    pending: Debouncer<NavigationDirection>,
}

impl Navigator {
    pub fn new(window: VisibleWindow, debounce: StdDuration) -> Self {
        Self {
            window,
            pending: Debouncer::new(debounce),
        }
    }

    pub fn window(&self) -> &VisibleWindow {
        &self.window
    }

    /// Direction of the navigation waiting to be committed, for slide animations.
    pub fn pending_direction(&self) -> Option<NavigationDirection> {
        self.pending.pending().copied()
    }

    pub fn deadline(&self) -> Option<DateTime<Local>> {
        self.pending.deadline()
    }

    /// Whether moving in `direction` would bring an in-range month into view.
    pub fn can_navigate(
        &self,
        direction: NavigationDirection,
        predicate: &dyn OutsideRange,
        base: CalendarDate,
    ) -> bool {
        let edge = match direction {
            NavigationDirection::Prev => self.window.first(),
            NavigationDirection::Next => self.window.last(),
        };
        !predicate.is_outside_range(edge, base)
    }

    /// Request a navigation. A newer request replaces a pending one.
    pub fn request(&mut self, direction: NavigationDirection, now: DateTime<Local>) {
        if let Some(superseded) = self.pending.schedule(direction, now) {
            log_debug!(
                "Navigation {} superseded by {}",
                superseded.as_str(),
                direction.as_str()
            );
        }
    }

    /// Commit the pending navigation once its quiet interval passed.
    pub fn poll(&mut self, now: DateTime<Local>) -> Option<NavigationDirection> {
        let direction = self.pending.poll(now)?;
        self.window = navigate(&self.window, direction);
        log_debug!(
            "Navigated {}: {} .. {}",
            direction.as_str(),
            self.window.first(),
            self.window.last()
        );
        Some(direction)
    }

    pub fn cancel(&mut self) {
        self.pending.cancel();
    }
}
