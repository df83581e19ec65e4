//! Spreadsheet export: one worksheet per unit.
//!
//! [`build_layout`] places every text cell; [`write_xlsx`] only encodes that
//! layout. Each sheet holds a two-row unit summary, the list of resources with
//! their summed reserved time, and then a block of reservation rows per
//! resource.

use std::collections::HashSet;

use rust_xlsxwriter::{Format, Workbook};

use crate::config::ExportConfig;
use crate::error::Result;
use crate::report::{Report, UnitReport};

/// Excel's limit on worksheet name length.
const MAX_SHEET_NAME_CHARS: usize = 31;

/// Characters Excel does not accept in worksheet names.
const FORBIDDEN_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// Blank rows between the resource summary and the first reservation block.
const GAP_AFTER_SUMMARY: u32 = 2;

/// Blank rows after each reservation block.
const GAP_AFTER_BLOCK: u32 = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row: u32,
    pub col: u16,
    pub text: String,
    pub bold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl SheetLayout {
    /// Text at `(row, col)`, if any.
    pub fn text_at(&self, row: u32, col: u16) -> Option<&str> {
        self.cells
            .iter()
            .find(|c| c.row == row && c.col == col)
            .map(|c| c.text.as_str())
    }

    fn put(&mut self, row: u32, col: u16, text: impl Into<String>, bold: bool) {
        self.cells.push(Cell {
            row,
            col,
            text: text.into(),
            bold,
        });
    }
}

/// Strip forbidden characters and keep the last 31 characters.
pub fn sheet_name(unit_name: &str) -> String {
    let cleaned: Vec<char> = unit_name
        .chars()
        .filter(|c| !FORBIDDEN_SHEET_CHARS.contains(c))
        .collect();
    let skip = cleaned.len().saturating_sub(MAX_SHEET_NAME_CHARS);
    cleaned[skip..].iter().collect()
}

/// Lay out every unit of the report as its own sheet.
///
/// Sheet names are made unique: an empty name becomes `Sheet{n}` and a repeated
/// one gets a ` (n)` suffix.
pub fn build_layout(report: &Report, config: &ExportConfig) -> Vec<SheetLayout> {
    let mut used = HashSet::new();

    report
        .units
        .iter()
        .enumerate()
        .map(|(index, unit)| {
            let name = unique_sheet_name(&sheet_name(&unit.name), index + 1, &mut used);
            unit_sheet(name, unit, report, config)
        })
        .collect()
}

fn unique_sheet_name(base: &str, position: usize, used: &mut HashSet<String>) -> String {
    let base = if base.is_empty() {
        format!("Sheet{}", position)
    } else {
        base.to_string()
    };

    let mut candidate = base.clone();
    let mut n = 2;
    while used.contains(&candidate.to_lowercase()) {
        let suffix = format!(" ({})", n);
        let keep = MAX_SHEET_NAME_CHARS.saturating_sub(suffix.chars().count());
        let head: String = base.chars().take(keep).collect();
        candidate = format!("{}{}", head, suffix);
        n += 1;
    }
    used.insert(candidate.to_lowercase());
    candidate
}

fn unit_sheet(name: String, unit: &UnitReport, report: &Report, config: &ExportConfig) -> SheetLayout {
    let labels = &config.labels;
    let mut sheet = SheetLayout {
        name,
        cells: Vec::new(),
    };

    sheet.put(0, 0, &labels.unit, true);
    sheet.put(0, 1, &labels.street_address, true);
    sheet.put(0, 2, &labels.day_period, true);
    sheet.put(0, 3, &labels.time_period, true);
    sheet.put(0, 4, &labels.unit_reservation_rate, true);
    sheet.put(3, 0, &labels.resource_name, true);
    sheet.put(3, 1, &labels.resource_type, true);
    sheet.put(3, 2, &labels.reserved_time_sum, true);

    sheet.put(1, 0, &unit.name, false);
    sheet.put(1, 1, &unit.street_address, false);
    sheet.put(1, 2, &report.day_period, false);
    sheet.put(1, 3, &report.time_period, false);
    sheet.put(1, 4, unit.unit_reservation_rate.to_string(), false);

    let mut row = 4;
    for resource in &unit.resources {
        sheet.put(row, 0, &resource.name, false);
        sheet.put(row, 1, &resource.resource_type, false);
        sheet.put(row, 2, resource.reserved_time_sum_display(), false);
        row += 1;
    }

    row += GAP_AFTER_SUMMARY;

    for resource in &unit.resources {
        sheet.put(row, 0, &resource.name, true);
        sheet.put(row, 1, &resource.resource_type, true);
        row += 1;

        sheet.put(row, 0, &labels.reserver_name, true);
        sheet.put(row, 1, &labels.event_subject, true);
        sheet.put(row, 2, &labels.begin, true);
        sheet.put(row, 3, &labels.end, true);
        row += 1;

        for reservation in &resource.reservations {
            sheet.put(row, 0, &reservation.reserver_name, false);
            sheet.put(row, 1, &reservation.event_subject, false);
            sheet.put(row, 2, reservation.begin_display(), false);
            sheet.put(row, 3, reservation.end_display(), false);
            row += 1;
        }

        row += GAP_AFTER_BLOCK;
    }

    sheet
}

/// Encode the report as an `.xlsx` workbook.
pub fn write_xlsx(report: &Report, config: &ExportConfig) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for layout in build_layout(report, config) {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&layout.name)?;
        for col in 0..=5 {
            worksheet.set_column_width(col, config.column_width)?;
        }

        for cell in &layout.cells {
            if cell.bold {
                worksheet.write_string_with_format(cell.row, cell.col, &cell.text, &header)?;
            } else {
                worksheet.write_string(cell.row, cell.col, &cell.text)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
