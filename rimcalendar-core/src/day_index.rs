//! Day-keyed indices for the current quadrum.
use serde::Serialize;
use smallvec::SmallVec;
use std::collections::BTreeMap;

use crate::constants::DAYS_PER_QUADRUM;
use crate::error::CalendarError;

/// Entries sharing a day, inline for the common one-or-two case.
pub type DayEntries<T> = SmallVec<[T; 2]>;

/// Mapping from displayed day (`1..=15`) to a non-empty, insertion-ordered
/// list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayIndex<T> {
    days: BTreeMap<u8, DayEntries<T>>,
}

impl<T> Default for DayIndex<T> {
    fn default() -> Self {
        Self {
            days: BTreeMap::new(),
        }
    }
}

impl<T> DayIndex<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `day` is a displayable quadrum day.
    #[must_use]
    pub fn accepts(day: u8) -> bool {
        (1..=DAYS_PER_QUADRUM).contains(&i32::from(day))
    }

    /// Append an entry to a day. Returns false (and drops the entry) when the
    /// day is outside `1..=15`.
    pub fn push(&mut self, day: u8, entry: T) -> bool {
        if !Self::accepts(day) {
            return false;
        }
        self.days.entry(day).or_default().push(entry);
        true
    }

    /// Entries for a day, empty when nothing falls on it.
    #[must_use]
    pub fn get(&self, day: u8) -> &[T] {
        self.days
            .get(&day)
            .map(|entries| entries.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn contains_day(&self, day: u8) -> bool {
        self.days.contains_key(&day)
    }

    /// Occupied days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = u8> + '_ {
        self.days.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[T])> {
        self.days
            .iter()
            .map(|(day, entries)| (*day, entries.as_slice()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Total entries across all days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.values().map(SmallVec::len).sum()
    }
}

/// Result of one indexer run: the rebuilt index plus every entry that was
/// skipped and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indexed<T> {
    pub index: DayIndex<T>,
    pub skipped: Vec<CalendarError>,
}

impl<T> Default for Indexed<T> {
    fn default() -> Self {
        Self {
            index: DayIndex::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> Indexed<T> {
    pub(crate) fn skip(&mut self, reason: CalendarError) {
        self.skipped.push(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_days_outside_quadrum() {
        let mut index = DayIndex::new();
        assert!(!index.push(0, "zero"));
        assert!(!index.push(16, "sixteen"));
        assert!(index.push(15, "last"));
        assert!(index.push(1, "first"));
        assert_eq!(index.days().collect::<Vec<_>>(), vec![1, 15]);
    }

    #[test]
    fn keeps_insertion_order_within_a_day() {
        let mut index = DayIndex::new();
        for name in ["a", "b", "c"] {
            index.push(4, name);
        }
        assert_eq!(index.get(4), &["a", "b", "c"]);
        assert_eq!(index.len(), 3);
        assert!(index.get(5).is_empty());
        assert!(!index.contains_day(5));
    }

    #[test]
    fn empty_by_default() {
        let index: DayIndex<u32> = DayIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
        assert_eq!(index.iter().count(), 0);
    }
}
