//! `rate-report` CLI: generate reservation rate reports from a JSON dataset.
//!
//! ## Usage
//!
//! ```sh
//! # Plain-text summary on stdout
//! rate-report report -d dataset.json -u u1 --start-date 2015-04-01 --end-date 2015-04-06
//!
//! # Explicit daily range, spreadsheet output
//! rate-report report -d dataset.json -u u1 -u u2 \
//!     --start-date 2015-04-01 --end-date 2015-04-06 \
//!     --start-time 09:00 --end-time 15:00 -o report.xlsx
//!
//! # JSON dump with a custom configuration
//! rate-report report -d dataset.json -u u1 --start-date 2015-04-01 \
//!     --end-date 2015-04-06 --config rate-report.toml --format json
//! ```
//!
//! Set `RUST_LOG=debug` to see per-resource sums.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use rate_engine::{write_xlsx, InMemoryStore, Report, ReportConfig, ReportGenerator, ReportRequest};
use std::io::Write;

#[derive(Parser)]
#[command(name = "rate-report", version, about = "Reservation rate report CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a reservation rate report
    Report {
        /// JSON dataset with units, resources, periods and reservations
        #[arg(short, long)]
        data: String,
        /// Unit id to include (repeatable)
        #[arg(short, long = "unit")]
        units: Vec<String>,
        /// First date of the window (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// Last date of the window (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
        /// Daily begin time (HH:MM); defaults to the configured value
        #[arg(long)]
        start_time: Option<String>,
        /// Daily end time (HH:MM); defaults to the configured value
        #[arg(long)]
        end_time: Option<String>,
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Output format; xlsx requires --output
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Xlsx,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            data,
            units,
            start_date,
            end_date,
            start_time,
            end_time,
            config,
            output,
            format,
        } => {
            let config = match config.as_deref() {
                Some(path) => ReportConfig::from_path(path)
                    .with_context(|| format!("Failed to load config: {}", path))?,
                None => ReportConfig::default(),
            };

            let json = std::fs::read_to_string(&data)
                .with_context(|| format!("Failed to read file: {}", data))?;
            let store = InMemoryStore::from_json(&json)
                .with_context(|| format!("Failed to parse dataset: {}", data))?;

            let request = ReportRequest {
                unit_ids: units,
                start_date,
                end_date,
                start_time,
                end_time,
            };
            let report = ReportGenerator::new(&store, &config).generate(&request)?;
            info!("report covers {} unit(s)", report.units.len());

            let format = format.unwrap_or(match output.as_deref() {
                Some(path) if path.ends_with(".xlsx") => OutputFormat::Xlsx,
                _ => OutputFormat::Text,
            });

            let bytes = match format {
                OutputFormat::Text => render_text(&report).into_bytes(),
                OutputFormat::Json => {
                    let mut pretty = serde_json::to_string_pretty(&report)?;
                    pretty.push('\n');
                    pretty.into_bytes()
                }
                OutputFormat::Xlsx => {
                    if output.is_none() {
                        anyhow::bail!(
                            "xlsx output needs a file; pass --output (e.g. {})",
                            config.export.file_name
                        );
                    }
                    write_xlsx(&report, &config.export).context("Failed to encode workbook")?
                }
            };

            write_output(output.as_deref(), &bytes)?;
        }
    }

    Ok(())
}

/// One block per unit: summary line, then one line per resource.
fn render_text(report: &Report) -> String {
    let mut out = format!("{}  {}\n", report.day_period, report.time_period);
    for unit in &report.units {
        out.push_str(&format!(
            "\n{} ({})\n  reservation rate: {}\n",
            unit.name, unit.street_address, unit.unit_reservation_rate
        ));
        for resource in &unit.resources {
            out.push_str(&format!(
                "  {} [{}]: {} reserved, {} reservation(s)\n",
                resource.name,
                resource.resource_type,
                resource.reserved_time_sum_display(),
                resource.reservations.len()
            ));
        }
    }
    out
}

fn write_output(path: Option<&str>, content: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            std::io::stdout()
                .write_all(content)
                .context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
