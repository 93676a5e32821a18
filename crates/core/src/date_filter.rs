//! Typed date predicates for child-entity queries.
//!
//! A [`DateFilter`] is built once from a [`ReportWindow`] and then either
//! evaluated in memory ([`DateFilter::contains`]) or lowered to a pair of
//! optional bind parameters ([`DateFilter::bounds`]) for SQL of the form
//! `($n::TIMESTAMPTZ IS NULL OR col >= $n)`.

use crate::report_window::ReportWindow;
use crate::types::Timestamp;

/// Inclusive predicate over a single timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    /// No restriction.
    #[default]
    Unbounded,
    /// `ts >= t`
    After(Timestamp),
    /// `ts <= t`
    Before(Timestamp),
    /// `start <= ts <= end`. Matches nothing when `start > end`.
    Between(Timestamp, Timestamp),
}

impl DateFilter {
    pub fn from_bounds(start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        match (start, end) {
            (None, None) => DateFilter::Unbounded,
            (Some(s), None) => DateFilter::After(s),
            (None, Some(e)) => DateFilter::Before(e),
            (Some(s), Some(e)) => DateFilter::Between(s, e),
        }
    }

    pub fn from_window(window: &ReportWindow) -> Self {
        Self::from_bounds(window.start, window.end)
    }

    /// Lower / upper inclusive bounds, `None` meaning open.
    pub fn bounds(&self) -> (Option<Timestamp>, Option<Timestamp>) {
        match *self {
            DateFilter::Unbounded => (None, None),
            DateFilter::After(s) => (Some(s), None),
            DateFilter::Before(e) => (None, Some(e)),
            DateFilter::Between(s, e) => (Some(s), Some(e)),
        }
    }

    /// Evaluate the predicate against `ts`.
    pub fn contains(&self, ts: Timestamp) -> bool {
        match *self {
            DateFilter::Unbounded => true,
            DateFilter::After(s) => ts >= s,
            DateFilter::Before(e) => ts <= e,
            DateFilter::Between(s, e) => s <= ts && ts <= e,
        }
    }

    /// Whether no timestamp can satisfy the predicate.
    pub fn is_empty(&self) -> bool {
        matches!(*self, DateFilter::Between(s, e) if s > e)
    }
}

impl From<&ReportWindow> for DateFilter {
    fn from(window: &ReportWindow) -> Self {
        Self::from_window(window)
    }
}
