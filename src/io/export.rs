//! CSV export for simulation results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::io::ingest::SourceTable;
use crate::sim::types::{IntervalRecord, IntervalResult};

/// Input columns written when the records have no source table.
const INPUT_HEADER: [&str; 5] = ["timestamp", "irradiance", "temperature", "load_kw", "price"];

/// Engine output columns, appended after the input columns.
const RESULT_HEADER: [&str; 7] = [
    "solar_output_kw",
    "battery_level_kwh",
    "battery_percentage",
    "grid_import_kwh",
    "cost",
    "curtailed_kwh",
    "flag",
];

/// Exports records and their results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per interval. Produces
/// deterministic output for identical inputs.
///
/// # Arguments
///
/// * `records` - Input records, in run order
/// * `results` - Engine results paired 1:1 with `records`
/// * `source` - The ingested table, echoed verbatim ahead of the results
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails, or if the
/// slices differ in length.
pub fn export_csv(
    records: &[IntervalRecord],
    results: &[IntervalResult],
    source: Option<&SourceTable>,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(records, results, source, buf)
}

/// Writes records and their results as CSV to any writer.
///
/// With a `source` table, its columns are written as read, except columns
/// named like a result column, which are replaced. Without one, the
/// records are written under the standard input header. Numbers are
/// written at full precision so the file reads back to the same values.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails or the inputs differ in length.
pub fn write_csv(
    records: &[IntervalRecord],
    results: &[IntervalResult],
    source: Option<&SourceTable>,
    writer: impl Write,
) -> io::Result<()> {
    let source_rows = source.map_or(records.len(), |s| s.rows.len());
    if records.len() != results.len() || source_rows != results.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "{} records, {source_rows} source rows and {} results; export needs one result per record",
                records.len(),
                results.len()
            ),
        ));
    }

    // Source columns that survive into the output
    let kept: Vec<usize> = source.map_or_else(Vec::new, |s| {
        s.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !RESULT_HEADER.contains(&h.as_str()))
            .map(|(i, _)| i)
            .collect()
    });

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    let mut header: Vec<&str> = match source {
        Some(s) => kept.iter().map(|&i| s.headers[i].as_str()).collect(),
        None => INPUT_HEADER.to_vec(),
    };
    header.extend(RESULT_HEADER);
    wtr.write_record(&header)?;

    // Data rows
    for (i, (rec, r)) in records.iter().zip(results).enumerate() {
        let mut row: Vec<String> = match source {
            Some(s) => kept
                .iter()
                .map(|&c| s.rows[i].get(c).cloned().unwrap_or_default())
                .collect(),
            None => vec![
                rec.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                rec.irradiance.to_string(),
                rec.ambient_temp_c.to_string(),
                rec.load_kw.to_string(),
                rec.price_per_kwh.to_string(),
            ],
        };
        row.extend([
            r.solar_kw.to_string(),
            r.battery_level_kwh.to_string(),
            r.battery_pct.to_string(),
            r.grid_import_kwh.to_string(),
            r.cost.to_string(),
            r.curtailed_kwh.to_string(),
            r.flag.as_ref().map(ToString::to_string).unwrap_or_default(),
        ]);
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
