//! Error types for rate-engine operations.

use thiserror::Error;

/// Caller-input failures detected before any aggregation starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing unit id(s)")]
    MissingUnits,

    #[error("Missing start date or end date")]
    MissingDates,

    #[error("Dates must be in Y-m-d format and times must be in H:M format")]
    MalformedDateTime,

    #[error("End time must be after begin time")]
    EndBeforeBegin,
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced unit or resource does not exist in the store.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dataset error: {0}")]
    Dataset(#[from] serde_json::Error),

    #[error("Spreadsheet export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),
}

impl ReportError {
    pub(crate) fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        ReportError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
