//! Date-range selection over the daily feed.
//!
//! [`RangeSelection`] holds the user's inclusive interval and never lets it invert:
//! moving one bound past the other pins it to the other bound instead of rejecting
//! the move. [`filter`] borrows the matching days out of the sorted feed.

use crate::models::{DailyAggregate, DateRange};
use chrono::NaiveDate;

/// True min/max dates of a sorted daily feed, or `None` when it is empty.
pub fn dataset_bounds(daily: &[DailyAggregate]) -> Option<DateRange> {
    match (daily.first(), daily.last()) {
        (Some(first), Some(last)) => Some(DateRange::new(first.date, last.date)),
        _ => None,
    }
}

/// Days of a date-sorted feed that fall inside `range`, both ends included.
pub fn filter<'a>(daily: &'a [DailyAggregate], range: &DateRange) -> &'a [DailyAggregate] {
    let lo = daily.partition_point(|day| day.date < range.start);
    let hi = daily.partition_point(|day| day.date <= range.end);
    &daily[lo..hi.max(lo)]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSelection {
    bounds: DateRange,
    range: DateRange,
}

impl RangeSelection {
    /// Start with the whole dataset selected.
    pub fn new(bounds: DateRange) -> Self {
        Self {
            bounds,
            range: bounds,
        }
    }

    pub fn for_dataset(daily: &[DailyAggregate]) -> Option<Self> {
        dataset_bounds(daily).map(Self::new)
    }

    pub fn bounds(&self) -> DateRange {
        self.bounds
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn set_start(&mut self, start: NaiveDate) -> DateRange {
        self.range.start = start.min(self.range.end);
        self.range
    }

    pub fn set_end(&mut self, end: NaiveDate) -> DateRange {
        self.range.end = end.max(self.range.start);
        self.range
    }

    pub fn reset(&mut self) -> DateRange {
        self.range = self.bounds;
        self.range
    }

    pub fn apply<'a>(&self, daily: &'a [DailyAggregate]) -> &'a [DailyAggregate] {
        filter(daily, &self.range)
    }
}
