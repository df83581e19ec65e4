//! Bottom-up aggregation: reservation → resource → unit → report.
//!
//! All lookups happen through a [`ReservationStore`] before any summing. Once
//! the data is fetched, aggregation cannot fail. Any lookup error aborts the
//! whole report; there are no partial reports.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime};
use chrono_tz::Tz;
use log::debug;
use serde::{Serialize, Serializer};

use crate::capacity::max_reservable_time_for;
use crate::config::ReportConfig;
use crate::error::{Result, ValidationError};
use crate::format::{
    format_day_period, format_duration, format_duration_pair, format_time_period,
    format_timestamp,
};
use crate::model::{ReservationRecord, Resource, Unit};
use crate::reserved::{reserved_time, sum_for_resource};
use crate::store::ReservationStore;
use crate::window::{QueryWindow, ReportRequest};

/// One reservation row as shown under its resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReservationDetail {
    pub reserver_name: String,
    pub event_subject: String,
    pub begin: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// Overlap with the window's daily range.
    #[serde(serialize_with = "as_seconds")]
    pub reserved_time: Duration,
}

impl ReservationDetail {
    pub fn from_record(record: &ReservationRecord, window: &QueryWindow) -> Self {
        let tz = window.timezone();
        Self {
            reserver_name: record.reserver_name.clone(),
            event_subject: record.event_subject.clone(),
            begin: record.begin.with_timezone(&tz),
            end: record.end.with_timezone(&tz),
            reserved_time: reserved_time(record, window),
        }
    }

    /// Local begin as `DD.MM.YYYY HH.MM`.
    pub fn begin_display(&self) -> String {
        format_timestamp(&self.begin)
    }

    pub fn end_display(&self) -> String {
        format_timestamp(&self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceReport {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Most recent begin first.
    pub reservations: Vec<ReservationDetail>,
    #[serde(serialize_with = "as_seconds")]
    pub reserved_time_sum: Duration,
    #[serde(serialize_with = "as_seconds")]
    pub max_reservable_time: Duration,
}

impl ResourceReport {
    pub fn build(
        resource: &Resource,
        reservations: &[ReservationRecord],
        max_reservable_time: Duration,
        window: &QueryWindow,
    ) -> Self {
        Self {
            name: resource.name.clone(),
            resource_type: resource.resource_type.clone(),
            reservations: reservations
                .iter()
                .map(|r| ReservationDetail::from_record(r, window))
                .collect(),
            reserved_time_sum: sum_for_resource(reservations, window),
            max_reservable_time,
        }
    }

    pub fn reserved_time_sum_display(&self) -> String {
        format_duration(self.reserved_time_sum)
    }
}

/// Consumed time against capacity. Kept as two durations, never a ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReservationRate {
    #[serde(serialize_with = "as_seconds")]
    pub reserved_time: Duration,
    #[serde(serialize_with = "as_seconds")]
    pub max_reservable_time: Duration,
}

impl fmt::Display for ReservationRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration_pair(
            self.reserved_time,
            self.max_reservable_time,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitReport {
    pub name: String,
    pub street_address: String,
    pub resources: Vec<ResourceReport>,
    pub unit_reservation_rate: ReservationRate,
}

impl UnitReport {
    pub fn build(unit: &Unit, resources: Vec<ResourceReport>) -> Self {
        let reserved_time = resources
            .iter()
            .fold(Duration::zero(), |total, r| total + r.reserved_time_sum);
        let max_reservable_time = resources
            .iter()
            .fold(Duration::zero(), |total, r| total + r.max_reservable_time);

        Self {
            name: unit.name.clone(),
            street_address: unit.street_address.clone(),
            resources,
            unit_reservation_rate: ReservationRate {
                reserved_time,
                max_reservable_time,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub begin: DateTime<Tz>,
    pub end: DateTime<Tz>,
    /// `DD.MM.YYYY - DD.MM.YYYY`
    pub day_period: String,
    /// `HH.MM - HH.MM`
    pub time_period: String,
    pub units: Vec<UnitReport>,
}

impl Report {
    pub fn build(window: &QueryWindow, units: Vec<UnitReport>) -> Self {
        let (begin, end) = (window.begin(), window.end());
        Self {
            begin,
            end,
            day_period: format_day_period(&begin, &end),
            time_period: format_time_period(&begin, &end),
            units,
        }
    }
}

/// Builds reports from a store using an explicit configuration.
pub struct ReportGenerator<'a, S: ?Sized> {
    store: &'a S,
    config: &'a ReportConfig,
}

impl<'a, S> ReportGenerator<'a, S>
where
    S: ReservationStore + ?Sized,
{
    pub fn new(store: &'a S, config: &'a ReportConfig) -> Self {
        Self { store, config }
    }

    /// Validate a raw request and generate its report.
    pub fn generate(&self, request: &ReportRequest) -> Result<Report> {
        let window = request.window(
            self.config.tz()?,
            &self.config.default_start_time,
            &self.config.default_end_time,
        )?;
        self.generate_for_window(&request.selected_units(), &window)
    }

    /// Generate a report for already-validated units and window.
    pub fn generate_for_window(&self, unit_ids: &[&str], window: &QueryWindow) -> Result<Report> {
        if unit_ids.is_empty() {
            return Err(ValidationError::MissingUnits.into());
        }

        let units = self.store.list_units(unit_ids)?;
        debug!("generating reservation rate report for {} unit(s)", units.len());

        let unit_reports = units
            .iter()
            .map(|unit| self.unit_report(unit, window))
            .collect::<Result<Vec<_>>>()?;

        Ok(Report::build(window, unit_reports))
    }

    fn unit_report(&self, unit: &Unit, window: &QueryWindow) -> Result<UnitReport> {
        let resources = self
            .store
            .list_resources(unit)?
            .iter()
            .map(|resource| self.resource_report(unit, resource, window))
            .collect::<Result<Vec<_>>>()?;

        let report = UnitReport::build(unit, resources);
        debug!("unit {}: {}", unit.id, report.unit_reservation_rate);
        Ok(report)
    }

    fn resource_report(
        &self,
        unit: &Unit,
        resource: &Resource,
        window: &QueryWindow,
    ) -> Result<ResourceReport> {
        let reservations = self.store.list_reservations(resource, window)?;
        let capacity = max_reservable_time_for(self.store, unit, resource, window)?;
        let report = ResourceReport::build(resource, &reservations, capacity, window);
        debug!(
            "resource {}: {} reservation(s), {} reserved",
            resource.id,
            reservations.len(),
            report.reserved_time_sum_display()
        );
        Ok(report)
    }
}

/// Generate a report for `unit_ids` over the wall-clock window `begin..end` in
/// `tz`.
///
/// # Errors
/// Validation errors for an empty selection or an inverted window; store
/// errors (e.g. unknown unit ids) are propagated unchanged.
pub fn generate_report<S>(
    store: &S,
    unit_ids: &[&str],
    begin: NaiveDateTime,
    end: NaiveDateTime,
    tz: Tz,
) -> Result<Report>
where
    S: ReservationStore + ?Sized,
{
    if unit_ids.is_empty() {
        return Err(ValidationError::MissingUnits.into());
    }
    let window = QueryWindow::from_local(begin, end, tz)?;
    let config = ReportConfig {
        timezone: tz.name().to_string(),
        ..ReportConfig::default()
    };
    ReportGenerator::new(store, &config).generate_for_window(unit_ids, &window)
}

fn as_seconds<S: Serializer>(d: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_i64(d.num_seconds())
}
