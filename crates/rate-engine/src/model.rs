//! Catalog and booking records as handed over by the storage collaborator.
//!
//! These are read-only inputs. The engine never mutates or persists them.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// A facility containing bookable resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub street_address: String,
}

/// A bookable space or item belonging to a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub unit_id: String,
    pub name: String,
    /// Display name of the resource type (e.g. "Meeting room").
    #[serde(rename = "type")]
    pub resource_type: String,
}

/// What an opening period is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum PeriodOwner {
    Unit(String),
    Resource(String),
}

impl PeriodOwner {
    /// Resolution priority: resource schedules override unit schedules.
    pub fn priority(&self) -> u8 {
        match self {
            PeriodOwner::Unit(_) => 0,
            PeriodOwner::Resource(_) => 1,
        }
    }
}

/// Opening times for one weekday inside an [`OpeningPeriod`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningDay {
    pub weekday: Weekday,
    #[serde(default)]
    pub opens: Option<NaiveTime>,
    #[serde(default)]
    pub closes: Option<NaiveTime>,
    #[serde(default)]
    pub closed: bool,
}

/// A schedule definition valid from `start` to `end` (both inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningPeriod {
    pub owner: PeriodOwner,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// The whole period is closed regardless of `days`.
    #[serde(default)]
    pub closed: bool,
    #[serde(default)]
    pub days: Vec<OpeningDay>,
}

impl OpeningPeriod {
    pub fn priority(&self) -> u8 {
        self.owner.priority()
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days between start and end. Shorter periods are more specific.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// A single booking of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    pub resource_id: String,
    pub begin: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub reserver_name: String,
    #[serde(default)]
    pub event_subject: String,
}
