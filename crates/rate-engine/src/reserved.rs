//! Reserved time per reservation and per resource.
//!
//! Only the time-of-day of a reservation is compared with the window's daily
//! range. Dates are ignored here: the store has already restricted the records
//! to the window's dates, and a booking that crosses midnight is not split.

use chrono::Duration;

use crate::model::ReservationRecord;
use crate::time_range::{overlap, TimeRange};
use crate::window::QueryWindow;

/// Overlap of one reservation's local clock range with the window's daily range.
pub fn reserved_time(reservation: &ReservationRecord, window: &QueryWindow) -> Duration {
    let tz = window.timezone();
    let begin = reservation.begin.with_timezone(&tz);
    let end = reservation.end.with_timezone(&tz);

    let booked = TimeRange::from_times(begin.time(), end.time());
    overlap(&booked, &window.daily_range())
}

/// Total reserved time of a resource's reservations.
pub fn sum_for_resource(reservations: &[ReservationRecord], window: &QueryWindow) -> Duration {
    reservations
        .iter()
        .map(|r| reserved_time(r, window))
        .fold(Duration::zero(), |total, d| total + d)
}
