//! Report and export configuration.
//!
//! Everything is passed explicitly to the generator and the exporter. A config
//! can be loaded from TOML; any field left out keeps its default.
//!
//! ```toml
//! timezone = "Europe/Helsinki"
//! default_start_time = "08:00"
//! default_end_time = "16:00"
//!
//! [export]
//! column_width = 40.0
//! file_name = "varausasteraportti.xlsx"
//!
//! [export.labels]
//! unit = "Unit"
//! ```

use std::path::Path;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ReportError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// IANA timezone used for date boundaries and local clock times.
    pub timezone: String,
    /// Daily begin time used when a request omits it (`HH:MM`).
    pub default_start_time: String,
    /// Daily end time used when a request omits it (`HH:MM`).
    pub default_end_time: String,
    pub export: ExportConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Helsinki".to_string(),
            default_start_time: "08:00".to_string(),
            default_end_time: "16:00".to_string(),
            export: ExportConfig::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: ReportConfig =
            toml::from_str(source).map_err(|e| ReportError::Config(e.to_string()))?;
        config.tz()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| ReportError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&source)
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| ReportError::InvalidTimezone(self.timezone.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Width applied to the first six columns of every sheet.
    pub column_width: f64,
    /// Suggested download name for the workbook.
    pub file_name: String,
    pub labels: SheetLabels,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            column_width: 40.0,
            file_name: "varausasteraportti.xlsx".to_string(),
            labels: SheetLabels::default(),
        }
    }
}

/// Header texts written to each sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetLabels {
    pub unit: String,
    pub street_address: String,
    pub day_period: String,
    pub time_period: String,
    pub unit_reservation_rate: String,
    pub resource_name: String,
    pub resource_type: String,
    pub reserved_time_sum: String,
    pub reserver_name: String,
    pub event_subject: String,
    pub begin: String,
    pub end: String,
}

impl Default for SheetLabels {
    fn default() -> Self {
        Self {
            unit: "Kiinteistö".to_string(),
            street_address: "Katuosoite".to_string(),
            day_period: "Ajankohta".to_string(),
            time_period: "Aikaväli".to_string(),
            unit_reservation_rate: "Kiinteistön varausaste".to_string(),
            resource_name: "Resurssin nimi".to_string(),
            resource_type: "Tilatyyppi".to_string(),
            reserved_time_sum: "Varatut ajat yhteensä".to_string(),
            reserver_name: "Varaajan nimi".to_string(),
            event_subject: "Varauksen nimi".to_string(),
            begin: "Alkoi".to_string(),
            end: "Päättyi".to_string(),
        }
    }
}
