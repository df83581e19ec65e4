//! Maximum reservable time: how much of the query's daily range the resource
//! is open, summed over every date of the window.

use chrono::Duration;
use log::debug;

use crate::error::Result;
use crate::model::{Resource, Unit};
use crate::opening_hours::{opening_hours_for, OpeningHoursMap};
use crate::store::ReservationStore;
use crate::time_range::{overlap, TimeRange};
use crate::window::QueryWindow;

/// Sum the overlap between the window's daily range and each date's opening
/// hours.
///
/// Only the first interval of a date is used. Closed dates add nothing.
pub fn max_reservable_time(hours: &OpeningHoursMap, window: &QueryWindow) -> Duration {
    let query = window.daily_range();

    hours
        .values()
        .filter_map(|intervals| intervals.first().and_then(|h| h.bounds()))
        .map(|(opens, closes)| overlap(&query, &TimeRange::from_times(opens, closes)))
        .fold(Duration::zero(), |total, d| total + d)
}

/// Resolve the resource's opening hours from `store` and compute its capacity
/// within the window.
pub fn max_reservable_time_for<S>(
    store: &S,
    unit: &Unit,
    resource: &Resource,
    window: &QueryWindow,
) -> Result<Duration>
where
    S: ReservationStore + ?Sized,
{
    let hours = opening_hours_for(store, unit, resource, window)?;
    let total = max_reservable_time(&hours, window);
    debug!(
        "resource {} open {} min over {} day(s)",
        resource.id,
        total.num_minutes(),
        hours.len()
    );
    Ok(total)
}
