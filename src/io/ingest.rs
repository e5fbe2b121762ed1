//! CSV ingestion of interval time series.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use crate::sim::types::IntervalRecord;

/// Accepted timestamp layouts, tried in order.
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Failure to turn a CSV file into interval records.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot open \"{}\": {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: unrecognised timestamp \"{value}\"")]
    Timestamp { line: u64, value: String },

    #[error("input contains no data rows")]
    Empty,
}

/// The file's own header and trimmed cell text, kept so an export can echo
/// the uploaded columns verbatim ahead of the results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Parsed records together with the table they were read from.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvInput {
    pub records: Vec<IntervalRecord>,
    pub source: SourceTable,
}

/// One CSV row as written by the logger, before timestamp parsing.
///
/// Column names used by the Indonesian logger export are accepted as aliases.
#[derive(Debug, Deserialize)]
struct RawRow {
    timestamp: String,
    irradiance: f64,
    #[serde(alias = "suhu", alias = "ambient_temp_c", alias = "temp")]
    temperature: f64,
    #[serde(alias = "beban_rumah_kw", alias = "load")]
    load_kw: f64,
    #[serde(alias = "harga_listrik", alias = "price_per_kwh")]
    price: f64,
}

/// Parses a timestamp in any of the accepted layouts.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Reads interval records from CSV data with a header row.
///
/// Required columns: `timestamp`, `irradiance`, `temperature`, `load_kw`,
/// `price` (or their aliases). Extra columns are ignored. Records are
/// returned in file order; values are not range-checked here.
///
/// # Errors
///
/// Returns an `IngestError` naming the 1-based file line of the first row
/// that cannot be parsed, or `Empty` if there are no data rows.
pub fn read_records(reader: impl Read) -> Result<Vec<IntervalRecord>, IngestError> {
    read_input(reader).map(|input| input.records)
}

/// Like [`read_records`], also keeping every column of the file as text.
///
/// # Errors
///
/// As [`read_records`].
pub fn read_input(reader: impl Read) -> Result<CsvInput, IngestError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|source| IngestError::Csv { line: 1, source })?
        .clone();

    let mut records = Vec::new();
    let mut rows = Vec::new();
    for (i, row) in rdr.records().enumerate() {
        let fallback_line = i as u64 + 2;
        let row = row.map_err(|source| IngestError::Csv {
            line: fallback_line,
            source,
        })?;
        let line = row.position().map_or(fallback_line, csv::Position::line);
        let raw: RawRow = row
            .deserialize(Some(&headers))
            .map_err(|source| IngestError::Csv { line, source })?;
        let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| IngestError::Timestamp {
            line,
            value: raw.timestamp.clone(),
        })?;
        records.push(IntervalRecord {
            timestamp,
            irradiance: raw.irradiance,
            ambient_temp_c: raw.temperature,
            load_kw: raw.load_kw,
            price_per_kwh: raw.price,
        });
        rows.push(row.iter().map(str::to_string).collect());
    }

    if records.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(CsvInput {
        records,
        source: SourceTable {
            headers: headers.iter().map(str::to_string).collect(),
            rows,
        },
    })
}

/// Reads interval records from a CSV file.
///
/// # Errors
///
/// Returns `IngestError::Open` if the file cannot be opened, otherwise as
/// [`read_records`].
pub fn read_records_from_path(path: &Path) -> Result<Vec<IntervalRecord>, IngestError> {
    read_input_from_path(path).map(|input| input.records)
}

/// Reads a CSV file, keeping its source table.
///
/// # Errors
///
/// As [`read_records_from_path`].
pub fn read_input_from_path(path: &Path) -> Result<CsvInput, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let input = read_input(std::io::BufReader::new(file))?;
    info!(
        path = %path.display(),
        rows = input.records.len(),
        columns = input.source.headers.len(),
        "loaded input series"
    );
    Ok(input)
}
