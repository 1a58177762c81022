//! Render a score table as JSON or CSV.

use std::io::Write;

use clap::ValueEnum;
use sa2_scorer::ScoreTable;
use serde::{Deserialize, Serialize};

use crate::CliError;

/// Supported table encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON array of rows.
    #[default]
    Json,
    /// CSV with a header row.
    Csv,
}

/// Write `table` to `writer` in ranking order.
pub(crate) fn write_table(
    writer: &mut dyn Write,
    table: &ScoreTable,
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => write_json(writer, table),
        OutputFormat::Csv => write_csv(writer, table),
    }
}

fn write_json(writer: &mut dyn Write, table: &ScoreTable) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(table).map_err(CliError::SerialiseTable)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

/// Column order of CSV output. Serialised rows follow the same order.
const CSV_HEADER: [&str; 16] = [
    "region_code",
    "region_name",
    "zone_name",
    "area_sqkm",
    "total_population",
    "young_population",
    "median_income",
    "businesses_per_1000",
    "stops_count",
    "catchments_per_1000_young",
    "poi_count",
    "z_business",
    "z_stops",
    "z_schools",
    "z_poi",
    "score",
];

fn write_csv(writer: &mut dyn Write, table: &ScoreTable) -> Result<(), CliError> {
    let mut csv = csv::Writer::from_writer(writer);
    if table.is_empty() {
        csv.write_record(CSV_HEADER).map_err(CliError::WriteCsv)?;
    }
    for row in table {
        csv.serialize(row).map_err(CliError::WriteCsv)?;
    }
    csv.flush().map_err(CliError::WriteOutput)
}
