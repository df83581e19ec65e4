//! Effective opening hours per calendar date.
//!
//! Unit and resource schedules may both define a given date. For every date in
//! the window the covering periods are ranked and the best one decides:
//!
//! 1. higher priority first (resource periods beat unit periods),
//! 2. then the shorter period (an exception week beats a season),
//! 3. then the earlier start date.
//!
//! A date nobody defines, a closed period, or a weekday without usable times
//! resolves to a single closed entry (`opens = closes = None`).

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::error::Result;
use crate::model::{OpeningPeriod, PeriodOwner, Resource, Unit};
use crate::store::ReservationStore;
use crate::window::{DateSpan, QueryWindow};

/// One opening interval on a date. Both sides are `None` when closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OpeningHours {
    pub opens: Option<NaiveTime>,
    pub closes: Option<NaiveTime>,
}

impl OpeningHours {
    pub fn open(opens: NaiveTime, closes: NaiveTime) -> Self {
        Self {
            opens: Some(opens),
            closes: Some(closes),
        }
    }

    pub fn closed() -> Self {
        Self {
            opens: None,
            closes: None,
        }
    }

    /// Both bounds, if the entry is open.
    pub fn bounds(&self) -> Option<(NaiveTime, NaiveTime)> {
        self.opens.zip(self.closes)
    }
}

/// Date → ordered opening intervals. Every date of the resolved span is present.
pub type OpeningHoursMap = BTreeMap<NaiveDate, Vec<OpeningHours>>;

/// Resolve the effective opening hours of every date in `span`.
pub fn resolve_opening_hours(periods: &[OpeningPeriod], span: &DateSpan) -> OpeningHoursMap {
    let mut ranked: Vec<&OpeningPeriod> = periods
        .iter()
        .filter(|p| span.intersects(p.start, p.end))
        .collect();
    ranked.sort_by_key(|p| (std::cmp::Reverse(p.priority()), p.span_days(), p.start));

    span.days()
        .map(|date| {
            let hours = ranked
                .iter()
                .find(|p| p.covers(date))
                .map(|p| hours_on(p, date))
                .unwrap_or_else(|| vec![OpeningHours::closed()]);
            (date, hours)
        })
        .collect()
}

fn hours_on(period: &OpeningPeriod, date: NaiveDate) -> Vec<OpeningHours> {
    if period.closed {
        return vec![OpeningHours::closed()];
    }

    let weekday = date.weekday();
    let mut hours: Vec<OpeningHours> = period
        .days
        .iter()
        .filter(|day| day.weekday == weekday && !day.closed)
        .filter_map(|day| Some(OpeningHours::open(day.opens?, day.closes?)))
        .collect();

    if hours.is_empty() {
        return vec![OpeningHours::closed()];
    }
    hours.sort_by_key(|h| h.opens);
    hours
}

/// Fetch the unit's and the resource's periods for the window's date span and
/// resolve them.
pub fn opening_hours_for<S>(
    store: &S,
    unit: &Unit,
    resource: &Resource,
    window: &QueryWindow,
) -> Result<OpeningHoursMap>
where
    S: ReservationStore + ?Sized,
{
    let span = window.date_span();

    let mut periods = store.list_opening_periods(&PeriodOwner::Unit(unit.id.clone()), &span)?;
    periods.extend(store.list_opening_periods(&PeriodOwner::Resource(resource.id.clone()), &span)?);

    Ok(resolve_opening_hours(&periods, &span))
}
