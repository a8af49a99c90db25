//! The picker controller consumed by a rendering layer.
//!
//! `DatePicker` composes the selection state machine, the modifier engine and the
//! window navigator, and owns every timer they need:
//!
//! - a debounce on navigation requests (only the last direction commits),
//! - a throttle on hover previews (the latest hovered date wins),
//! - a minute ticker refreshing the reference date ("today") on minute boundaries.
//!
//! Timers are driven by [`DatePicker::poll`] against the picker's own time source.
//! [`DatePicker::teardown`] (also run on drop) cancels all of them; after teardown
//! every event and poll is a no-op.
//!
//! Per-cell range checks are the renderer's job: clicks on cells it shows as disabled
//! are expected to be filtered out before they reach [`DatePicker::click_day`].

use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration as StdDuration;

use crate::calendar::{CalendarDate, MonthMatrix, WeekStart, build_month_matrix};
use crate::common::constants::*;
use crate::keyboard::{KeyAction, NavigationKey, key_action};
use crate::modifiers::{ModifierFlag, ModifierMap, ModifierSet};
use crate::navigator::{NavigationDirection, Navigator, VisibleWindow, focus_after_navigation};
use crate::outside_range::OutsideRange;
use crate::selection::{PickMode, SelectionState};
use crate::time_source::TimeSource;
use crate::timers::{MinuteTicker, Throttle};

/// Static picker settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOptions {
    pub pick: PickMode,
    pub number_of_months: usize,
    pub week_start: WeekStart,
    pub navigation_debounce: StdDuration,
    pub hover_throttle: StdDuration,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            pick: DEFAULT_PICK_MODE,
            number_of_months: DEFAULT_NUMBER_OF_MONTHS,
            week_start: DEFAULT_WEEK_START,
            navigation_debounce: StdDuration::from_millis(DEFAULT_NAVIGATION_DEBOUNCE_MS),
            hover_throttle: StdDuration::from_millis(DEFAULT_HOVER_THROTTLE_MS),
        }
    }
}

/// What happened during one [`DatePicker::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PollOutcome {
    /// A navigation was committed in this direction.
    pub navigated: Option<NavigationDirection>,
    /// A throttled hover preview replaced the modifier map.
    pub preview_updated: bool,
    /// The minute ticker fired and the reference date changed.
    pub today_changed: bool,
}

impl PollOutcome {
    pub fn changed(&self) -> bool {
        self.navigated.is_some() || self.preview_updated || self.today_changed
    }
}

pub struct DatePicker {
    options: PickerOptions,
    predicate: Box<dyn OutsideRange>,
    clock: Arc<dyn TimeSource>,
    today: CalendarDate,
    selection: SelectionState,
    modifiers: ModifierMap,
    navigator: Navigator,
    hover: Throttle<CalendarDate>,
    ticker: MinuteTicker,
    focus_request: Option<CalendarDate>,
    torn_down: bool,
}

impl DatePicker {
    pub fn new(
        options: PickerOptions,
        predicate: impl OutsideRange + 'static,
        clock: Arc<dyn TimeSource>,
        date_from: Option<CalendarDate>,
        date_to: Option<CalendarDate>,
    ) -> Self {
        let now = clock.now();
        let today = CalendarDate::from(now.date_naive());
        let number_of_months = options
            .number_of_months
            .clamp(MINIMUM_NUMBER_OF_MONTHS, MAXIMUM_NUMBER_OF_MONTHS);

        let selection = SelectionState::new(options.pick, date_from, date_to);
        let window =
            VisibleWindow::initial(number_of_months, date_from, date_to, today, &predicate);

        Self {
            modifiers: selection.modifiers(),
            selection,
            navigator: Navigator::new(window, options.navigation_debounce),
            hover: Throttle::new(options.hover_throttle),
            ticker: MinuteTicker::new(now),
            options: PickerOptions {
                number_of_months,
                ..options
            },
            predicate: Box::new(predicate),
            clock,
            today,
            focus_request: None,
            torn_down: false,
        }
    }

    pub fn options(&self) -> &PickerOptions {
        &self.options
    }

    /// Reference date used for range checks.
    pub fn today(&self) -> CalendarDate {
        self.today
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Current modifier snapshot.
    pub fn modifiers(&self) -> &ModifierMap {
        &self.modifiers
    }

    pub fn window(&self) -> &VisibleWindow {
        self.navigator.window()
    }

    /// Direction of a navigation that is pending, for slide animations.
    pub fn pending_direction(&self) -> Option<NavigationDirection> {
        self.navigator.pending_direction()
    }

    /// Grids for every anchor of the window, buffer months included.
    pub fn month_matrices(&self) -> Vec<MonthMatrix> {
        self.window()
            .anchors()
            .iter()
            .map(|anchor| build_month_matrix(*anchor, self.options.week_start))
            .collect()
    }

    /// Grids for the visible months only.
    pub fn visible_matrices(&self) -> Vec<MonthMatrix> {
        self.window()
            .visible()
            .iter()
            .map(|anchor| build_month_matrix(*anchor, self.options.week_start))
            .collect()
    }

    pub fn is_outside_range(&self, day: CalendarDate) -> bool {
        self.predicate.is_outside_range(day, self.today)
    }

    /// Modifier flags for one cell, with `disabled` derived from the predicate.
    pub fn cell_state(&self, day: CalendarDate) -> ModifierSet {
        let mut flags = self.modifiers.flags(day);
        if self.is_outside_range(day) {
            flags.set(ModifierFlag::Disabled);
        }
        flags
    }

    /// Whether the month containing `month` can be picked as a whole.
    pub fn is_month_selectable(&self, month: CalendarDate) -> bool {
        self.selection.mode() == PickMode::Range && !self.is_outside_range(month.start_of_month())
    }

    pub fn can_navigate(&self, direction: NavigationDirection) -> bool {
        self.navigator
            .can_navigate(direction, &*self.predicate, self.today)
    }

    pub fn click_day(&mut self, day: CalendarDate) {
        if self.torn_down {
            return;
        }
        // A trailing preview must not overwrite the committed selection
        self.hover.cancel();
        self.modifiers = self.selection.click_day(day);
    }

    /// Hover or focus on a candidate end date.
    ///
    /// Previews are throttled: the first hover after a quiet interval applies
    /// immediately, later ones within the interval are applied by [`Self::poll`].
    pub fn hover_day(&mut self, day: CalendarDate) {
        if self.torn_down || !self.selection.is_awaiting_end() {
            return;
        }
        let now = self.clock.now();
        if let Some(day) = self.hover.submit(day, now) {
            self.apply_preview(day);
        }
    }

    fn apply_preview(&mut self, day: CalendarDate) -> bool {
        match self.selection.preview(day) {
            Some(map) => {
                self.modifiers = map;
                true
            }
            None => false,
        }
    }

    /// Pick the whole month containing `month`. Returns false when not allowed.
    pub fn click_month(&mut self, month: CalendarDate) -> bool {
        if self.torn_down {
            return false;
        }
        self.hover.cancel();
        match self
            .selection
            .select_month(month, &*self.predicate, self.today)
        {
            Some(map) => {
                self.modifiers = map;
                true
            }
            None => false,
        }
    }

    /// Request a month navigation. Returns false when the edge month is outside range.
    pub fn request_navigation(&mut self, direction: NavigationDirection) -> bool {
        if self.torn_down {
            return false;
        }
        if !self.can_navigate(direction) {
            log_debug!("Navigation {} rejected: edge month outside range", direction.as_str());
            return false;
        }
        let now = self.clock.now();
        self.navigator.request(direction, now);
        true
    }

    /// Handle a key press on the cell whose date key is `focused`.
    ///
    /// Returns true when the key was handled (focus moved or navigation requested).
    pub fn key_down(&mut self, key: &str, focused: &str) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(key) = NavigationKey::from_key(key) else {
            return false;
        };
        match key_action(key, focused, self.options.week_start) {
            Some(KeyAction::Focus(date)) => {
                self.focus_request = Some(date);
                true
            }
            Some(KeyAction::Navigate(direction)) => self.request_navigation(direction),
            None => false,
        }
    }

    /// Date whose cell should receive focus, consumed by the renderer.
    pub fn take_focus_request(&mut self) -> Option<CalendarDate> {
        self.focus_request.take()
    }

    /// Fire every timer whose deadline passed.
    pub fn poll(&mut self) -> PollOutcome {
        let mut outcome = PollOutcome::default();
        if self.torn_down {
            return outcome;
        }
        let now = self.clock.now();

        if self.ticker.poll(now) {
            let today = CalendarDate::from(now.date_naive());
            if today != self.today {
                log_debug!("Reference date moved from {} to {}", self.today, today);
                self.today = today;
                outcome.today_changed = true;
            }
        }

        if let Some(direction) = self.navigator.poll(now) {
            self.focus_request = Some(focus_after_navigation(
                self.navigator.window(),
                self.today,
                self.options.week_start,
            ));
            outcome.navigated = Some(direction);
        }

        if let Some(day) = self.hover.poll(now) {
            outcome.preview_updated = self.apply_preview(day);
        }

        outcome
    }

    /// Earliest pending timer deadline, for event loops that sleep between polls.
    pub fn next_deadline(&self) -> Option<DateTime<Local>> {
        if self.torn_down {
            return None;
        }
        [
            self.navigator.deadline(),
            self.hover.deadline(),
            self.ticker.deadline(),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Replace the selection with new initial dates and reset the cursor.
    pub fn reset(&mut self, date_from: Option<CalendarDate>, date_to: Option<CalendarDate>) {
        self.hover.cancel();
        self.selection = SelectionState::new(self.selection.mode(), date_from, date_to);
        self.modifiers = self.selection.modifiers();
    }

    pub fn set_pick_mode(&mut self, mode: PickMode) {
        self.hover.cancel();
        self.options.pick = mode;
        self.selection.set_mode(mode);
        self.modifiers = self.selection.modifiers();
    }

    /// Cancel every pending timer. Later events and polls are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.navigator.cancel();
        self.hover.cancel();
        self.ticker.cancel();
        self.focus_request = None;
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Drop for DatePicker {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outside_range::{DateBounds, NeverOutside};
    use crate::time_source::{SimulatedTimeSource, parse_datetime};

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    fn clock(at: &str) -> Arc<SimulatedTimeSource> {
        Arc::new(SimulatedTimeSource::new(parse_datetime(at).unwrap()))
    }

    fn range_picker(clock: &Arc<SimulatedTimeSource>) -> DatePicker {
        DatePicker::new(
            PickerOptions::default(),
            NeverOutside,
            clock.clone(),
            None,
            None,
        )
    }

    #[test]
    fn test_hover_preview_is_throttled() {
        let clock = clock("2024-01-10 12:00:00");
        let mut picker = range_picker(&clock);
        picker.click_day(date("2024-01-10"));

        picker.hover_day(date("2024-01-12"));
        assert_eq!(picker.modifiers().dates_with(ModifierFlag::Range).len(), 3);

        clock.advance(StdDuration::from_millis(5));
        picker.hover_day(date("2024-01-14"));
        clock.advance(StdDuration::from_millis(5));
        picker.hover_day(date("2024-01-15"));
        // Still showing the leading preview
        assert_eq!(picker.modifiers().dates_with(ModifierFlag::Range).len(), 3);

        clock.advance(StdDuration::from_millis(10));
        let outcome = picker.poll();
        assert!(outcome.preview_updated);
        assert_eq!(picker.modifiers().dates_with(ModifierFlag::Range).len(), 6);
        // Preview does not move the selection
        assert_eq!(picker.selection().end_date(), None);
    }

    #[test]
    fn test_click_cancels_trailing_preview() {
        let clock = clock("2024-01-10 12:00:00");
        let mut picker = range_picker(&clock);
        picker.click_day(date("2024-01-10"));
        picker.hover_day(date("2024-01-11"));
        picker.hover_day(date("2024-01-20"));
        picker.click_day(date("2024-01-12"));

        clock.advance(StdDuration::from_millis(100));
        assert!(!picker.poll().preview_updated);
        assert_eq!(picker.modifiers().dates_with(ModifierFlag::Range).len(), 3);
    }

    #[test]
    fn test_hover_ignored_when_awaiting_start() {
        let clock = clock("2024-01-10 12:00:00");
        let mut picker = range_picker(&clock);
        picker.hover_day(date("2024-01-12"));
        assert!(picker.modifiers().is_empty());
    }

    #[test]
    fn test_minute_tick_refreshes_today() {
        let clock = clock("2024-01-10 23:59:30");
        let mut picker = range_picker(&clock);
        assert_eq!(picker.today(), date("2024-01-10"));

        clock.advance(StdDuration::from_secs(20));
        assert!(!picker.poll().today_changed);

        clock.advance(StdDuration::from_secs(15));
        assert!(picker.poll().today_changed);
        assert_eq!(picker.today(), date("2024-01-11"));
    }

    #[test]
    fn test_disable_future_follows_refreshed_today() {
        let clock = clock("2024-01-10 23:59:59");
        let bounds = DateBounds {
            disable_future: true,
            ..Default::default()
        };
        let mut picker =
            DatePicker::new(PickerOptions::default(), bounds, clock.clone(), None, None);
        assert!(picker.cell_state(date("2024-01-11")).disabled);

        clock.advance(StdDuration::from_secs(2));
        picker.poll();
        assert!(!picker.cell_state(date("2024-01-11")).disabled);
    }

    #[test]
    fn test_navigation_rejected_at_range_edge() {
        let clock = clock("2024-03-10 10:00:00");
        let bounds = DateBounds {
            max: Some(date("2024-03-31")),
            ..Default::default()
        };
        let mut picker =
            DatePicker::new(PickerOptions::default(), bounds, clock.clone(), None, None);
        // Window is Jan..Apr; the trailing buffer April is outside range
        assert!(!picker.can_navigate(NavigationDirection::Next));
        assert!(!picker.request_navigation(NavigationDirection::Next));
        assert_eq!(picker.pending_direction(), None);
        assert!(picker.request_navigation(NavigationDirection::Prev));
    }

    #[test]
    fn test_page_down_navigates_then_requests_focus() {
        let clock = clock("2024-03-20 10:00:00");
        let mut picker = range_picker(&clock);
        assert!(picker.key_down("PageDown", "2024-03-20"));
        assert_eq!(picker.pending_direction(), Some(NavigationDirection::Next));
        assert_eq!(picker.take_focus_request(), None);

        clock.advance(StdDuration::from_millis(DEFAULT_NAVIGATION_DEBOUNCE_MS));
        let outcome = picker.poll();
        assert_eq!(outcome.navigated, Some(NavigationDirection::Next));
        // Window now ends its visible part at April 2024
        assert_eq!(picker.take_focus_request(), Some(date("2024-04-17")));
    }

    #[test]
    fn test_arrow_key_sets_focus_request() {
        let clock = clock("2024-03-20 10:00:00");
        let mut picker = range_picker(&clock);
        assert!(picker.key_down("ArrowRight", "2024-03-20"));
        assert_eq!(picker.take_focus_request(), Some(date("2024-03-21")));
        assert!(!picker.key_down("ArrowRight", "not-a-date"));
        assert!(!picker.key_down("Tab", "2024-03-20"));
        assert_eq!(picker.take_focus_request(), None);
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let clock = clock("2024-03-20 10:00:00");
        let mut picker = range_picker(&clock);
        let window = picker.window().clone();
        picker.request_navigation(NavigationDirection::Next);
        picker.teardown();

        assert_eq!(picker.next_deadline(), None);
        clock.advance(StdDuration::from_secs(120));
        assert_eq!(picker.poll(), PollOutcome::default());
        assert_eq!(picker.window(), &window);
        assert!(!picker.request_navigation(NavigationDirection::Next));
    }

    #[test]
    fn test_next_deadline_is_earliest_timer() {
        let clock = clock("2024-03-20 10:00:00");
        let mut picker = range_picker(&clock);
        let minute = parse_datetime("2024-03-20 10:01:00").unwrap();
        assert_eq!(picker.next_deadline(), Some(minute));

        picker.request_navigation(NavigationDirection::Prev);
        let debounce = clock.now() + chrono::Duration::milliseconds(250);
        assert_eq!(picker.next_deadline(), Some(debounce));
    }

    #[test]
    fn test_reset_and_mode_switch() {
        let clock = clock("2024-03-20 10:00:00");
        let mut picker = range_picker(&clock);
        picker.click_day(date("2024-03-01"));
        assert!(picker.selection().is_awaiting_end());

        picker.reset(Some(date("2024-03-05")), Some(date("2024-03-07")));
        assert!(!picker.selection().is_awaiting_end());
        assert_eq!(picker.modifiers().dates_with(ModifierFlag::Range).len(), 3);

        picker.set_pick_mode(PickMode::Single);
        assert_eq!(picker.selection().end_date(), None);
        assert!(!picker.is_month_selectable(date("2024-03-01")));
        assert!(!picker.click_month(date("2024-03-01")));
    }
}
