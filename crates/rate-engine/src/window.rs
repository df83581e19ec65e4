//! The query window a report is computed over, and the request values it is
//! parsed from.
//!
//! A window is a date span plus one daily time-of-day range. The same clock
//! range (`begin.time()..end.time()`) is applied to every calendar day in the
//! span, which is why `begin.time() > end.time()` is rejected even when the
//! absolute timestamps are ordered.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::time_range::TimeRange;

const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl DateSpan {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// True when the inclusive range `start..=end` shares at least one date
    /// with this span.
    pub fn intersects(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.last && end >= self.first
    }

    /// Every date of the span in ascending order. Empty when `last < first`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let last = self.last;
        self.first.iter_days().take_while(move |day| *day <= last)
    }
}

/// Date range plus daily time-of-day range, fixed to one timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    begin: DateTime<Tz>,
    end: DateTime<Tz>,
}

impl QueryWindow {
    /// Build a window from two aware timestamps.
    ///
    /// `end` is converted into `begin`'s timezone before the checks.
    ///
    /// # Errors
    /// Returns [`ValidationError::EndBeforeBegin`] if `begin > end` or if the
    /// daily range would be inverted (`begin.time() > end.time()`).
    pub fn new(begin: DateTime<Tz>, end: DateTime<Tz>) -> Result<Self, ValidationError> {
        let end = end.with_timezone(&begin.timezone());
        if begin > end || begin.time() > end.time() {
            return Err(ValidationError::EndBeforeBegin);
        }
        Ok(Self { begin, end })
    }

    /// Build a window from wall-clock values in `tz`.
    ///
    /// A wall-clock time that falls into a DST gap cannot be placed on the
    /// timeline and is reported as malformed. An ambiguous one (DST fold)
    /// resolves to the earlier instant.
    pub fn from_local(
        begin: NaiveDateTime,
        end: NaiveDateTime,
        tz: Tz,
    ) -> Result<Self, ValidationError> {
        if begin > end || begin.time() > end.time() {
            return Err(ValidationError::EndBeforeBegin);
        }
        let begin = localize(begin, tz)?;
        let end = localize(end, tz)?;
        Self::new(begin, end)
    }

    pub fn begin(&self) -> DateTime<Tz> {
        self.begin
    }

    pub fn end(&self) -> DateTime<Tz> {
        self.end
    }

    pub fn timezone(&self) -> Tz {
        self.begin.timezone()
    }

    /// The clock range intersected on every day of the window.
    pub fn daily_range(&self) -> TimeRange {
        TimeRange::from_times(self.begin.time(), self.end.time())
    }

    /// Local calendar dates from the begin date to the end date, inclusive.
    pub fn date_span(&self) -> DateSpan {
        DateSpan::new(self.begin.date_naive(), self.end.date_naive())
    }

    /// Whether a reservation belongs to this window for reporting purposes.
    ///
    /// Both timestamps are taken in the window's timezone. A reservation is
    /// excluded when it starts after the last date, ends before the first date,
    /// starts after the daily end time or ends before the daily begin time.
    pub fn admits(&self, begin: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let tz = self.timezone();
        let begin = begin.with_timezone(&tz);
        let end = end.with_timezone(&tz);

        !(begin.date_naive() > self.end.date_naive()
            || end.date_naive() < self.begin.date_naive()
            || begin.time() > self.end.time()
            || end.time() < self.begin.time())
    }
}

fn localize(naive: NaiveDateTime, tz: Tz) -> Result<DateTime<Tz>, ValidationError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => {
            warn!(
                "ambiguous local time {} in {}, using the earlier instant",
                naive,
                tz.name()
            );
            Ok(earliest)
        }
        LocalResult::None => Err(ValidationError::MalformedDateTime),
    }
}

/// Report parameters as received from the request layer.
///
/// Dates are `YYYY-MM-DD`, times `HH:MM`. Empty strings count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub unit_ids: Vec<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl ReportRequest {
    pub fn new<I, S>(unit_ids: I, start_date: &str, end_date: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unit_ids: unit_ids.into_iter().map(Into::into).collect(),
            start_date: Some(start_date.to_string()),
            end_date: Some(end_date.to_string()),
            start_time: None,
            end_time: None,
        }
    }

    pub fn with_times(mut self, start_time: &str, end_time: &str) -> Self {
        self.start_time = Some(start_time.to_string());
        self.end_time = Some(end_time.to_string());
        self
    }

    /// Unit ids with blanks removed, in request order.
    pub fn selected_units(&self) -> Vec<&str> {
        self.unit_ids
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .collect()
    }

    /// Validate the request and build its query window.
    ///
    /// Checks run in order: unit selection, date presence, date/time format,
    /// ordering. Missing times fall back to `default_start` / `default_end`.
    pub fn window(
        &self,
        tz: Tz,
        default_start: &str,
        default_end: &str,
    ) -> Result<QueryWindow, ValidationError> {
        if self.selected_units().is_empty() {
            return Err(ValidationError::MissingUnits);
        }

        let (start_date, end_date) = match (present(&self.start_date), present(&self.end_date)) {
            (Some(start), Some(end)) => (start, end),
            _ => return Err(ValidationError::MissingDates),
        };
        let start_time = present(&self.start_time).unwrap_or(default_start);
        let end_time = present(&self.end_time).unwrap_or(default_end);

        let begin = parse_local(start_date, start_time)?;
        let end = parse_local(end_date, end_time)?;

        QueryWindow::from_local(begin, end, tz)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse `YYYY-MM-DD` + `HH:MM`. The year must be written with four digits.
fn parse_local(date: &str, time: &str) -> Result<NaiveDateTime, ValidationError> {
    let year_digits = date.split('-').next().map_or(0, str::len);
    if year_digits != 4 {
        return Err(ValidationError::MalformedDateTime);
    }
    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), DATE_TIME_FORMAT)
        .map_err(|_| ValidationError::MalformedDateTime)
}
