use proptest::prelude::*;
use rangepick::calendar::{CalendarDate, WeekStart, build_month_matrix};
use rangepick::modifiers::{ModifierFlag, ModifierMap, merge_modifiers};
use rangepick::navigator::{NavigationDirection, VisibleWindow, navigate};
use rangepick::selection::{PickMode, SelectionState};

/// Generate a date between 1900 and 2199
fn date_strategy() -> impl Strategy<Value = CalendarDate> {
    (1900i32..2200, 1u32..=12, 1u32..=31).prop_map(|(year, month, day)| {
        CalendarDate::new(year, month, 1)
            .map(|first| first.add_days(i64::from(day.min(first.days_in_month()) - 1)))
            .unwrap()
    })
}

fn week_start_strategy() -> impl Strategy<Value = WeekStart> {
    prop_oneof![Just(WeekStart::Sunday), Just(WeekStart::Monday)]
}

fn direction_strategy() -> impl Strategy<Value = NavigationDirection> {
    prop_oneof![Just(NavigationDirection::Prev), Just(NavigationDirection::Next)]
}

/// Property tests for month grid construction
#[cfg(test)]
mod matrix_tests {
    use super::*;

    proptest! {
        /// Every day of the month appears exactly once, in its weekday column
        #[test]
        fn test_matrix_places_every_day_once(
            anchor in date_strategy(),
            week_start in week_start_strategy()
        ) {
            let matrix = build_month_matrix(anchor, week_start);
            let dates: Vec<CalendarDate> = matrix.dates().collect();

            prop_assert_eq!(dates.len() as u32, anchor.days_in_month());
            prop_assert_eq!(dates[0], anchor.start_of_month());
            for pair in dates.windows(2) {
                prop_assert_eq!(pair[0].add_days(1), pair[1]);
            }
            for (row, week) in matrix.weeks().iter().enumerate() {
                for (column, slot) in week.iter().enumerate() {
                    if let Some(day) = slot {
                        prop_assert_eq!(week_start.column(*day), column);
                        prop_assert!(day.same_month(anchor), "row {} holds {}", row, day);
                    }
                }
            }
        }

        /// Four to six rows, first and last rows never empty
        #[test]
        fn test_matrix_row_count(
            anchor in date_strategy(),
            week_start in week_start_strategy()
        ) {
            let matrix = build_month_matrix(anchor, week_start);
            prop_assert!((4..=6).contains(&matrix.row_count()),
                "{} rows for {}", matrix.row_count(), anchor);
            prop_assert!(matrix.weeks()[0].iter().any(Option::is_some));
            prop_assert!(matrix.weeks()[matrix.row_count() - 1].iter().any(Option::is_some));
        }

        /// Week numbers stay within the week-numbering year
        #[test]
        fn test_week_number_bounds(
            day in date_strategy(),
            week_start in week_start_strategy()
        ) {
            let number = week_start.week_number(day);
            prop_assert!(number.week >= 1);
            prop_assert!(number.week <= week_start.weeks_in_year(number.year));
            prop_assert!((day.year() - 1..=day.year() + 1).contains(&number.year));
        }
    }
}

/// Property tests for modifier merges
#[cfg(test)]
mod modifier_tests {
    use super::*;

    proptest! {
        /// Merging the same span twice changes nothing
        #[test]
        fn test_merge_is_idempotent(
            a in date_strategy(),
            offset in -90i64..90
        ) {
            let b = a.add_days(offset);
            let once = merge_modifiers(&ModifierMap::new(), ModifierFlag::Range, Some(a), Some(b));
            let twice = merge_modifiers(&once, ModifierFlag::Range, Some(a), Some(b));
            prop_assert_eq!(once, twice);
        }

        /// The span covers both endpoints and every day between, and nothing else
        #[test]
        fn test_merge_span_is_inclusive(
            a in date_strategy(),
            offset in -90i64..90
        ) {
            let b = a.add_days(offset);
            let map = merge_modifiers(&ModifierMap::new(), ModifierFlag::Range, Some(a), Some(b));
            let (from, to) = if a <= b { (a, b) } else { (b, a) };

            prop_assert_eq!(map.len() as i64, offset.abs() + 1);
            prop_assert!(map.has(from, ModifierFlag::Range));
            prop_assert!(map.has(to, ModifierFlag::Range));
            prop_assert!(!map.has(from.add_days(-1), ModifierFlag::Range));
            prop_assert!(!map.has(to.add_days(1), ModifierFlag::Range));
        }

        /// Merges only add flags
        #[test]
        fn test_merge_never_clears_flags(
            a in date_strategy(),
            offset in 0i64..40
        ) {
            let cursors = ModifierMap::new().with(ModifierFlag::Cursor, Some(a), None);
            let merged = merge_modifiers(&cursors, ModifierFlag::Range, Some(a), Some(a.add_days(offset)));
            prop_assert!(merged.has(a, ModifierFlag::Cursor));
            prop_assert!(merged.has(a, ModifierFlag::Range));
        }
    }
}

/// Property tests for the sliding window and selection
#[cfg(test)]
mod state_tests {
    use super::*;

    proptest! {
        /// Navigation keeps n + 2 consecutive months and shifts them by exactly one
        #[test]
        fn test_window_shift_invariant(
            anchor in date_strategy(),
            months in 1usize..=12,
            directions in prop::collection::vec(direction_strategy(), 1..20)
        ) {
            let mut window = VisibleWindow::ending_at(anchor, months);
            for direction in directions {
                let next = navigate(&window, direction);
                prop_assert_eq!(next.len(), months + 2);
                for pair in next.anchors().windows(2) {
                    prop_assert_eq!(pair[0].add_months(1), pair[1]);
                }
                let shift = match direction {
                    NavigationDirection::Next => 1,
                    NavigationDirection::Prev => -1,
                };
                prop_assert_eq!(next.first(), window.first().add_months(shift));
                window = next;
            }
        }

        /// A completed range is never inverted, whatever the click order
        #[test]
        fn test_selection_never_inverted(
            clicks in prop::collection::vec(date_strategy(), 1..12)
        ) {
            let mut selection = SelectionState::new(PickMode::Range, None, None);
            for day in clicks {
                let map = selection.click_day(day);
                if let (Some(start), Some(end)) = (selection.start_date(), selection.end_date()) {
                    prop_assert!(start <= end);
                    prop_assert_eq!(map.len() as i64, start.days_until(end) + 1);
                }
            }
        }

        /// Single mode never holds an end date
        #[test]
        fn test_single_mode_has_no_end(
            clicks in prop::collection::vec(date_strategy(), 1..12)
        ) {
            let mut selection = SelectionState::new(PickMode::Single, None, None);
            for day in clicks {
                let map = selection.click_day(day);
                prop_assert_eq!(selection.start_date(), Some(day));
                prop_assert_eq!(selection.end_date(), None);
                prop_assert_eq!(map.dates_with(ModifierFlag::Cursor), vec![day]);
            }
        }
    }
}
