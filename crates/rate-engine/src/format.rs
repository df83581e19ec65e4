//! Human-readable strings for durations, periods and timestamps.

use chrono::{DateTime, Duration, TimeZone};

/// Render a duration as `"{hours}h {minutes}min"`.
///
/// Hours are truncated; the remaining minutes are rounded, so 1h 29m 30s
/// becomes `"1h 30min"`. A remainder of 59.5 minutes or more renders as
/// `"60min"` without carrying into the hour.
pub fn format_duration(d: Duration) -> String {
    let seconds = d.num_seconds();
    let hours = seconds / 3600;
    let minutes = ((seconds as f64 / 60.0) % 60.0).round() as i64;
    format!("{}h {}min", hours, minutes)
}

/// Render a consumed/capacity pair as `"1h 30min / 3h 0min"`.
pub fn format_duration_pair(first: Duration, second: Duration) -> String {
    format!("{} / {}", format_duration(first), format_duration(second))
}

/// `"DD.MM.YYYY - DD.MM.YYYY"`
pub fn format_day_period<Tz: TimeZone>(begin: &DateTime<Tz>, end: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} - {}", begin.format("%d.%m.%Y"), end.format("%d.%m.%Y"))
}

/// `"HH.MM - HH.MM"`
pub fn format_time_period<Tz: TimeZone>(begin: &DateTime<Tz>, end: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} - {}", begin.format("%H.%M"), end.format("%H.%M"))
}

/// `"DD.MM.YYYY HH.MM"` in the timestamp's own timezone.
pub fn format_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%d.%m.%Y %H.%M").to_string()
}
