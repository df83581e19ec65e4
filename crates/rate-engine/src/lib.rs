//! # rate-engine
//!
//! Reservation rate reports for facility units.
//!
//! For a set of units and a query window (date span plus one daily time-of-day
//! range) the engine measures how much of each resource's opening time was
//! consumed by reservations. Results are aggregated reservation → resource →
//! unit and rendered either as plain data or as a spreadsheet.
//!
//! ## Modules
//!
//! - [`time_range`] — Time-of-day ranges and the overlap primitive
//! - [`window`] — Query window, date spans, request validation
//! - [`model`] — Units, resources, opening periods, reservations
//! - [`opening_hours`] — Effective opening hours per date with priority resolution
//! - [`capacity`] — Maximum reservable time of a resource within the window
//! - [`reserved`] — Reserved time per reservation and per resource
//! - [`report`] — Aggregation into the report structure
//! - [`format`] — Duration and period strings
//! - [`store`] — Storage collaborator trait and in-memory dataset
//! - [`config`] — Report and export configuration
//! - [`export`] — Spreadsheet layout and `.xlsx` encoding
//! - [`error`] — Error types

pub mod capacity;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod model;
pub mod opening_hours;
pub mod report;
pub mod reserved;
pub mod store;
pub mod time_range;
pub mod window;

pub use capacity::max_reservable_time;
pub use config::{ExportConfig, ReportConfig, SheetLabels};
pub use error::{ReportError, ValidationError};
pub use export::{build_layout, write_xlsx};
pub use format::{format_duration, format_duration_pair};
pub use model::{OpeningDay, OpeningPeriod, PeriodOwner, ReservationRecord, Resource, Unit};
pub use opening_hours::{resolve_opening_hours, OpeningHours, OpeningHoursMap};
pub use report::{
    generate_report, ReservationDetail, ReservationRate, Report, ReportGenerator, ResourceReport,
    UnitReport,
};
pub use reserved::{reserved_time, sum_for_resource};
pub use store::{InMemoryStore, ReservationStore};
pub use time_range::{overlap, TimeRange};
pub use window::{DateSpan, QueryWindow, ReportRequest};
