//! Per-date cell annotations and their merge rules.
//!
//! A `ModifierMap` maps dates to the flags a renderer needs to draw a cell (cursor
//! endpoints, range span, highlight, hover, disabled). Maps are snapshots: they are
//! rebuilt by pure merges whenever the selection changes and never mutated in place
//! on behalf of a caller.
//!
//! Merges only ever raise flags. Setting `range` on a date that already carries
//! `cursor` leaves `cursor` set, which is how a selection map is composed from one
//! `range` pass over the span and one `cursor` pass per endpoint.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar::CalendarDate;

/// A single modifier flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierFlag {
    Cursor,
    Range,
    Highlighted,
    Hovered,
    Disabled,
}

/// The flags carried by one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ModifierSet {
    pub cursor: bool,
    pub range: bool,
    pub highlighted: bool,
    pub hovered: bool,
    pub disabled: bool,
}

impl ModifierSet {
    pub fn set(&mut self, flag: ModifierFlag) {
        match flag {
            ModifierFlag::Cursor => self.cursor = true,
            ModifierFlag::Range => self.range = true,
            ModifierFlag::Highlighted => self.highlighted = true,
            ModifierFlag::Hovered => self.hovered = true,
            ModifierFlag::Disabled => self.disabled = true,
        }
    }

    pub fn has(&self, flag: ModifierFlag) -> bool {
        match flag {
            ModifierFlag::Cursor => self.cursor,
            ModifierFlag::Range => self.range,
            ModifierFlag::Highlighted => self.highlighted,
            ModifierFlag::Hovered => self.hovered,
            ModifierFlag::Disabled => self.disabled,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ModifierSet::default()
    }
}

/// Date-keyed modifier snapshot.
///
/// Serializes as an object keyed by canonical `YYYY-MM-DD` date keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ModifierMap(BTreeMap<CalendarDate, ModifierSet>);

impl ModifierMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: CalendarDate) -> Option<&ModifierSet> {
        self.0.get(&date)
    }

    /// Look up a cell by its canonical date key. Malformed keys have no entry.
    pub fn get_by_key(&self, key: &str) -> Option<&ModifierSet> {
        CalendarDate::parse(key).ok().and_then(|date| self.get(date))
    }

    /// Flags for a date, empty when the date has no entry.
    pub fn flags(&self, date: CalendarDate) -> ModifierSet {
        self.get(date).copied().unwrap_or_default()
    }

    pub fn has(&self, date: CalendarDate, flag: ModifierFlag) -> bool {
        self.flags(date).has(flag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CalendarDate, &ModifierSet)> {
        self.0.iter()
    }

    /// Dates carrying `flag`, in ascending order.
    pub fn dates_with(&self, flag: ModifierFlag) -> Vec<CalendarDate> {
        self.0
            .iter()
            .filter(|(_, set)| set.has(flag))
            .map(|(date, _)| *date)
            .collect()
    }

    /// Consuming form of [`merge_modifiers`], convenient for chaining passes.
    pub fn with(
        mut self,
        flag: ModifierFlag,
        date_a: Option<CalendarDate>,
        date_b: Option<CalendarDate>,
    ) -> Self {
        apply(&mut self.0, flag, date_a, date_b);
        self
    }
}

fn apply(
    entries: &mut BTreeMap<CalendarDate, ModifierSet>,
    flag: ModifierFlag,
    date_a: Option<CalendarDate>,
    date_b: Option<CalendarDate>,
) {
    for date in [date_a, date_b].into_iter().flatten() {
        entries.entry(date).or_default().set(flag);
    }

    // The span covers every date from the earlier endpoint through the later one
    if let (Some(a), Some(b)) = (date_a, date_b) {
        let (from, to) = if a <= b { (a, b) } else { (b, a) };
        for offset in 0..from.days_until(to) {
            entries.entry(from.add_days(offset)).or_default().set(flag);
        }
    }
}

/// Merge `flag` onto the endpoints `date_a`/`date_b` and, when both are given, onto
/// every date between them.
///
/// Returns a new snapshot and leaves `existing` untouched. When neither date is given
/// the result has the same content as `existing`.
pub fn merge_modifiers(
    existing: &ModifierMap,
    flag: ModifierFlag,
    date_a: Option<CalendarDate>,
    date_b: Option<CalendarDate>,
) -> ModifierMap {
    if date_a.is_none() && date_b.is_none() {
        return existing.clone();
    }

    existing.clone().with(flag, date_a, date_b)
}
