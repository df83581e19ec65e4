//! The storage collaborator the report reads from, plus an in-memory
//! implementation used by the CLI and by tests.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};
use crate::model::{OpeningPeriod, PeriodOwner, ReservationRecord, Resource, Unit};
use crate::window::{DateSpan, QueryWindow};

/// Read access to units, resources, opening periods and reservations.
///
/// Implementations must return read-consistent data for the duration of one
/// report; the engine calls these methods and then aggregates in memory.
pub trait ReservationStore {
    /// Units matching `ids`, ordered by name.
    ///
    /// # Errors
    /// Returns [`ReportError::NotFound`] if an id does not resolve.
    fn list_units(&self, ids: &[&str]) -> Result<Vec<Unit>>;

    /// Resources of a unit, ordered by type.
    fn list_resources(&self, unit: &Unit) -> Result<Vec<Resource>>;

    /// Periods attached to `owner` that intersect `span`.
    fn list_opening_periods(&self, owner: &PeriodOwner, span: &DateSpan)
        -> Result<Vec<OpeningPeriod>>;

    /// Reservations of a resource that fall within the window, newest first.
    ///
    /// See [`QueryWindow::admits`] for the exact filter.
    fn list_reservations(
        &self,
        resource: &Resource,
        window: &QueryWindow,
    ) -> Result<Vec<ReservationRecord>>;
}

/// A complete dataset held in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InMemoryStore {
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub periods: Vec<OpeningPeriod>,
    #[serde(default)]
    pub reservations: Vec<ReservationRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dataset from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_period(mut self, period: OpeningPeriod) -> Self {
        self.periods.push(period);
        self
    }

    pub fn with_reservation(mut self, reservation: ReservationRecord) -> Self {
        self.reservations.push(reservation);
        self
    }
}

impl ReservationStore for InMemoryStore {
    fn list_units(&self, ids: &[&str]) -> Result<Vec<Unit>> {
        if let Some(missing) = ids.iter().find(|id| !self.units.iter().any(|u| u.id == **id)) {
            return Err(ReportError::not_found("unit", *missing));
        }

        let mut units: Vec<Unit> = self
            .units
            .iter()
            .filter(|u| ids.contains(&u.id.as_str()))
            .cloned()
            .collect();
        units.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(units)
    }

    fn list_resources(&self, unit: &Unit) -> Result<Vec<Resource>> {
        let mut resources: Vec<Resource> = self
            .resources
            .iter()
            .filter(|r| r.unit_id == unit.id)
            .cloned()
            .collect();
        resources.sort_by(|a, b| a.resource_type.cmp(&b.resource_type));
        Ok(resources)
    }

    fn list_opening_periods(
        &self,
        owner: &PeriodOwner,
        span: &DateSpan,
    ) -> Result<Vec<OpeningPeriod>> {
        Ok(self
            .periods
            .iter()
            .filter(|p| p.owner == *owner && span.intersects(p.start, p.end))
            .cloned()
            .collect())
    }

    fn list_reservations(
        &self,
        resource: &Resource,
        window: &QueryWindow,
    ) -> Result<Vec<ReservationRecord>> {
        let mut reservations: Vec<ReservationRecord> = self
            .reservations
            .iter()
            .filter(|r| r.resource_id == resource.id && window.admits(r.begin, r.end))
            .cloned()
            .collect();
        reservations.sort_by(|a, b| b.begin.cmp(&a.begin));
        Ok(reservations)
    }
}
