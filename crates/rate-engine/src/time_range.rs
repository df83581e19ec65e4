//! Time-of-day intervals and the overlap primitive shared by capacity and
//! reserved-time calculations.
//!
//! A [`TimeRange`] carries no date. Callers decide which day a range belongs to;
//! the range itself only knows how far past midnight it starts and ends.

use chrono::{Duration, NaiveTime, Timelike};

/// A single day's clock interval, stored as offsets from midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: Duration,
    pub end: Duration,
}

impl TimeRange {
    pub fn new(start: Duration, end: Duration) -> Self {
        Self { start, end }
    }

    /// Build a range from two clock times at minute precision.
    ///
    /// Seconds are dropped, so `09:00:59` and `09:00:00` produce the same range.
    pub fn from_times(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: since_midnight(start),
            end: since_midnight(end),
        }
    }

    /// Length of the range. Negative when `end < start`.
    pub fn length(&self) -> Duration {
        self.end - self.start
    }

    /// Overlapping duration with `other`, never negative.
    pub fn overlap(&self, other: &TimeRange) -> Duration {
        overlap(self, other)
    }
}

/// Duration both ranges have in common.
///
/// `max(0, min(r1.end, r2.end) - max(r1.start, r2.start))`
///
/// Example: a 09:00–15:00 query against an 08:00–11:00 booking overlaps for
/// 2 hours (09:00–11:00).
pub fn overlap(r1: &TimeRange, r2: &TimeRange) -> Duration {
    let latest_start = r1.start.max(r2.start);
    let earliest_end = r1.end.min(r2.end);
    let delta = earliest_end - latest_start;

    if delta > Duration::zero() {
        delta
    } else {
        Duration::zero()
    }
}

fn since_midnight(time: NaiveTime) -> Duration {
    Duration::hours(time.hour() as i64) + Duration::minutes(time.minute() as i64)
}
