//! Rules deciding whether a date is selectable and navigable.
//!
//! Every check receives the date in question and the reference date ("today") the
//! picker currently holds, so rules like "nothing after today" keep working when the
//! reference date rolls over.

use crate::calendar::CalendarDate;

/// Decides whether a date lies outside the selectable range.
pub trait OutsideRange {
    fn is_outside_range(&self, day: CalendarDate, base: CalendarDate) -> bool;
}

impl<F> OutsideRange for F
where
    F: Fn(CalendarDate, CalendarDate) -> bool,
{
    fn is_outside_range(&self, day: CalendarDate, base: CalendarDate) -> bool {
        self(day, base)
    }
}

/// Accepts every date.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverOutside;

impl OutsideRange for NeverOutside {
    fn is_outside_range(&self, _day: CalendarDate, _base: CalendarDate) -> bool {
        false
    }
}

/// Inclusive bounds, optionally capped at the reference date.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateBounds {
    pub min: Option<CalendarDate>,
    pub max: Option<CalendarDate>,
    /// Dates after the reference date are outside range.
    pub disable_future: bool,
}

impl OutsideRange for DateBounds {
    fn is_outside_range(&self, day: CalendarDate, base: CalendarDate) -> bool {
        self.min.is_some_and(|min| day < min)
            || self.max.is_some_and(|max| day > max)
            || (self.disable_future && day > base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let bounds = DateBounds {
            min: Some(date("2024-01-10")),
            max: Some(date("2024-01-20")),
            disable_future: false,
        };
        let base = date("2024-01-15");
        assert!(bounds.is_outside_range(date("2024-01-09"), base));
        assert!(!bounds.is_outside_range(date("2024-01-10"), base));
        assert!(!bounds.is_outside_range(date("2024-01-20"), base));
        assert!(bounds.is_outside_range(date("2024-01-21"), base));
    }

    #[test]
    fn test_disable_future_uses_reference_date() {
        let bounds = DateBounds {
            disable_future: true,
            ..Default::default()
        };
        assert!(!bounds.is_outside_range(date("2024-01-15"), date("2024-01-15")));
        assert!(bounds.is_outside_range(date("2024-01-16"), date("2024-01-15")));
        assert!(!bounds.is_outside_range(date("2024-01-16"), date("2024-01-16")));
    }

    #[test]
    fn test_closures_are_predicates() {
        let weekends = |day: CalendarDate, _base: CalendarDate| {
            matches!(day.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
        };
        assert!(weekends.is_outside_range(date("2024-03-09"), date("2024-03-01")));
        assert!(!weekends.is_outside_range(date("2024-03-08"), date("2024-03-01")));
        assert!(!NeverOutside.is_outside_range(date("1900-01-01"), date("2024-03-01")));
    }
}
