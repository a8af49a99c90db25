//! Logical calendar dates and week numbering.
//!
//! `CalendarDate` is a thin wrapper over `chrono::NaiveDate` that adds the calendar
//! operations a month grid needs (month/week boundaries, clamped month arithmetic) and
//! the canonical `YYYY-MM-DD` key used for modifier lookups and focus requests.
//! Arithmetic that would leave chrono's representable range saturates at
//! `NaiveDate::MIN`/`MAX` rather than panicking.

use anyhow::{Context, Result};
use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::constants::DATE_KEY_FORMAT;

/// An immutable logical date (year, month, day) without time or zone.
///
/// Equality and ordering are by calendar identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Create a date from its parts, `None` when the parts do not form a valid date.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a canonical `YYYY-MM-DD` date key.
    pub fn parse(input: &str) -> Result<Self> {
        NaiveDate::parse_from_str(input.trim(), DATE_KEY_FORMAT)
            .map(Self)
            .with_context(|| format!("Invalid date '{input}', expected YYYY-MM-DD"))
    }

    pub fn naive(self) -> NaiveDate {
        self.0
    }

    /// Canonical `YYYY-MM-DD` key.
    pub fn key(self) -> String {
        self.0.format(DATE_KEY_FORMAT).to_string()
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    pub fn month(self) -> u32 {
        self.0.month()
    }

    pub fn day(self) -> u32 {
        self.0.day()
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday()
    }

    /// Shift by a signed number of days, saturating at the representable range.
    pub fn add_days(self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        Self(shifted.unwrap_or(if days >= 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        }))
    }

    pub fn add_weeks(self, weeks: i64) -> Self {
        self.add_days(weeks.saturating_mul(7))
    }

    /// Shift by a signed number of months.
    ///
    /// The day is clamped to the last day of the target month, so
    /// `2024-01-31 + 1 month == 2024-02-29`.
    pub fn add_months(self, months: i32) -> Self {
        let shifted = if months >= 0 {
            self.0.checked_add_months(Months::new(months.unsigned_abs()))
        } else {
            self.0.checked_sub_months(Months::new(months.unsigned_abs()))
        };
        Self(shifted.unwrap_or(if months >= 0 {
            NaiveDate::MAX
        } else {
            NaiveDate::MIN
        }))
    }

    pub fn start_of_month(self) -> Self {
        self.0.with_day(1).map(Self).unwrap_or(self)
    }

    pub fn end_of_month(self) -> Self {
        match self.start_of_month().0.checked_add_months(Months::new(1)) {
            Some(next) => Self(next).add_days(-1),
            // No following month: this is the last month chrono can represent
            None => Self(NaiveDate::MAX),
        }
    }

    pub fn days_in_month(self) -> u32 {
        self.end_of_month().day()
    }

    pub fn start_of_week(self, week_start: WeekStart) -> Self {
        self.add_days(-(week_start.column(self) as i64))
    }

    pub fn end_of_week(self, week_start: WeekStart) -> Self {
        self.start_of_week(week_start).add_days(6)
    }

    /// Signed number of days from `self` to `other` (`other - self`).
    pub fn days_until(self, other: CalendarDate) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// Number of whole weeks from `self` to `other`, truncated toward zero.
    pub fn weeks_until(self, other: CalendarDate) -> i64 {
        self.days_until(other) / 7
    }

    /// A strictly increasing index of the month this date belongs to.
    pub fn month_index(self) -> i64 {
        self.year() as i64 * 12 + self.month() as i64 - 1
    }

    pub fn same_month(self, other: CalendarDate) -> bool {
        self.month_index() == other.month_index()
    }

    pub fn is_before(self, other: CalendarDate) -> bool {
        self < other
    }

    /// The date falling on `weekday` within the week containing `self`.
    pub fn with_weekday(self, weekday: Weekday, week_start: WeekStart) -> Self {
        self.start_of_week(week_start)
            .add_days(week_start.column_of(weekday) as i64)
    }

    pub fn week_number(self, week_start: WeekStart) -> WeekNumber {
        week_start.week_number(self)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl FromStr for CalendarDate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_KEY_FORMAT))
    }
}

/// A week number within a week-numbering year.
///
/// The week-numbering year can differ from the calendar year for dates near
/// January 1st (late December may belong to week 1 of the next year and early
/// January to the last week of the previous one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeekNumber {
    pub year: i32,
    pub week: u32,
}

/// Which weekday opens a week, and with it the week-numbering scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Locale weeks: Sunday first, week 1 is the week containing January 1st.
    #[default]
    Sunday,
    /// ISO 8601 weeks: Monday first, week 1 is the week containing January 4th.
    Monday,
}

impl WeekStart {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeekStart::Sunday => "sunday",
            WeekStart::Monday => "monday",
        }
    }

    pub fn first_weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Column (0-6) of a weekday in a grid starting on this weekday.
    pub fn column_of(self, weekday: Weekday) -> usize {
        match self {
            WeekStart::Sunday => weekday.num_days_from_sunday() as usize,
            WeekStart::Monday => weekday.num_days_from_monday() as usize,
        }
    }

    /// Column (0-6) of a date in a grid starting on this weekday.
    pub fn column(self, date: CalendarDate) -> usize {
        self.column_of(date.weekday())
    }

    /// Weekdays in grid order.
    pub fn weekdays(self) -> [Weekday; 7] {
        let first = self.first_weekday();
        let mut days = [first; 7];
        for i in 1..7 {
            days[i] = days[i - 1].succ();
        }
        days
    }

    /// First day of week 1 of the given week-numbering year.
    fn week_one_start(self, year: i32) -> CalendarDate {
        let anchor_day = match self {
            WeekStart::Sunday => 1,
            WeekStart::Monday => 4,
        };
        let anchor = match CalendarDate::new(year, 1, anchor_day) {
            Some(date) => date,
            None if year < 0 => CalendarDate(NaiveDate::MIN),
            None => CalendarDate(NaiveDate::MAX),
        };
        anchor.start_of_week(self)
    }

    /// Number of weeks (52 or 53) in the given week-numbering year.
    pub fn weeks_in_year(self, year: i32) -> u32 {
        let days = self
            .week_one_start(year)
            .days_until(self.week_one_start(year.saturating_add(1)));
        (days / 7).max(1) as u32
    }

    pub fn week_number(self, date: CalendarDate) -> WeekNumber {
        let year = date.year();
        let week_year = if date >= self.week_one_start(year.saturating_add(1)) {
            year.saturating_add(1)
        } else if date < self.week_one_start(year) {
            year.saturating_sub(1)
        } else {
            year
        };
        let offset = self
            .week_one_start(week_year)
            .days_until(date.start_of_week(self));
        WeekNumber {
            year: week_year,
            week: (offset / 7 + 1).max(1) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn test_parse_and_key_roundtrip_canonical_form() {
        let d = date("2024-03-05");
        assert_eq!(d.key(), "2024-03-05");
        assert_eq!(d.to_string(), "2024-03-05");
        assert_eq!((d.year(), d.month(), d.day()), (2024, 3, 5));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(CalendarDate::parse("").is_err());
        assert!(CalendarDate::parse("2024-13-01").is_err());
        assert!(CalendarDate::parse("2023-02-29").is_err());
        assert!(CalendarDate::parse("not a date").is_err());
    }

    #[test]
    fn test_add_months_clamps_day() {
        assert_eq!(date("2024-01-31").add_months(1), date("2024-02-29"));
        assert_eq!(date("2023-03-31").add_months(-1), date("2023-02-28"));
        assert_eq!(date("2023-12-15").add_months(1), date("2024-01-15"));
    }

    #[test]
    fn test_month_boundaries() {
        assert_eq!(date("2024-02-14").start_of_month(), date("2024-02-01"));
        assert_eq!(date("2024-02-14").end_of_month(), date("2024-02-29"));
        assert_eq!(date("2023-12-03").end_of_month(), date("2023-12-31"));
        assert_eq!(date("2023-02-10").days_in_month(), 28);
    }

    #[test]
    fn test_week_boundaries_follow_week_start() {
        // 2024-03-06 is a Wednesday
        let d = date("2024-03-06");
        assert_eq!(d.start_of_week(WeekStart::Sunday), date("2024-03-03"));
        assert_eq!(d.end_of_week(WeekStart::Sunday), date("2024-03-09"));
        assert_eq!(d.start_of_week(WeekStart::Monday), date("2024-03-04"));
        assert_eq!(d.end_of_week(WeekStart::Monday), date("2024-03-10"));
    }

    #[test]
    fn test_days_until_is_signed() {
        assert_eq!(date("2024-01-15").days_until(date("2024-02-20")), 36);
        assert_eq!(date("2024-02-20").days_until(date("2024-01-15")), -36);
    }

    #[test]
    fn test_iso_week_numbers_match_chrono() {
        let mut d = date("2019-12-01");
        while d < date("2027-02-01") {
            let ours = WeekStart::Monday.week_number(d);
            let iso = d.naive().iso_week();
            assert_eq!((ours.year, ours.week), (iso.year(), iso.week()), "{d}");
            d = d.add_days(1);
        }
    }

    #[test]
    fn test_sunday_weeks_roll_into_next_year() {
        // The week of 2023-12-31 (Sunday) contains 2024-01-01
        let wn = WeekStart::Sunday.week_number(date("2023-12-31"));
        assert_eq!(wn, WeekNumber { year: 2024, week: 1 });
        let wn = WeekStart::Sunday.week_number(date("2023-12-30"));
        assert_eq!(wn, WeekNumber { year: 2023, week: 52 });
    }

    #[test]
    fn test_weeks_in_year_detects_long_years() {
        assert_eq!(WeekStart::Monday.weeks_in_year(2020), 53);
        assert_eq!(WeekStart::Monday.weeks_in_year(2021), 52);
        // 2022 starts on a Saturday: its Sunday-week year spans 53 weeks
        assert_eq!(WeekStart::Sunday.weeks_in_year(2022), 53);
        assert_eq!(WeekStart::Sunday.weeks_in_year(2023), 52);
    }

    #[test]
    fn test_with_weekday_stays_in_week() {
        let d = date("2024-03-06");
        assert_eq!(
            d.with_weekday(Weekday::Sat, WeekStart::Sunday),
            date("2024-03-09")
        );
        assert_eq!(
            d.with_weekday(Weekday::Sun, WeekStart::Monday),
            date("2024-03-10")
        );
    }

    #[test]
    fn test_add_days_saturates() {
        let max = CalendarDate::from(NaiveDate::MAX);
        assert_eq!(max.add_days(10), max);
        let min = CalendarDate::from(NaiveDate::MIN);
        assert_eq!(min.add_days(-10), min);
    }

    #[test]
    fn test_month_bounds_at_calendar_limits() {
        let max = CalendarDate::from(NaiveDate::MAX);
        assert_eq!(max.end_of_month(), max);
        assert_eq!(max.days_in_month(), 31);
        let min = CalendarDate::from(NaiveDate::MIN);
        assert_eq!(min.start_of_month(), min);
        assert_eq!(min.days_in_month(), 31);
    }
}
