// src/services/prices.rs
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Writer};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{PriceRecord, ReturnRecord};

pub const DATE_COLUMN: &str = "Date";
pub const CLOSE_COLUMN: &str = "Close";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Unparseable date '{value}' on line {line}")]
    DateParse { value: String, line: u64 },
    #[error("Missing {column} field on line {line}")]
    MissingField { column: &'static str, line: u64 },
}

pub type Result<T> = std::result::Result<T, DataError>;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses the date formats a Kaggle-style export is likely to contain.
/// Time components are dropped.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn column_index(headers: &StringRecord, column: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or_else(|| DataError::MissingColumn(column.to_string()))
}

fn parse_close(cell: &str) -> f64 {
    cell.trim().parse::<f64>().unwrap_or(f64::NAN)
}

/// Reads `Date` and `Close` from a price history CSV, in file order.
///
/// Blank or non-numeric closes load as `NAN` and are left for the
/// calculation to skip. An unparseable date fails the whole load.
pub fn read_prices<P: AsRef<Path>>(path: P) -> Result<Vec<PriceRecord>> {
    let path = path.as_ref();
    info!("Reading price history from {}", path.display());

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = rdr.headers()?.clone();
    let date_idx = column_index(&headers, DATE_COLUMN)?;
    let close_idx = column_index(&headers, CLOSE_COLUMN)?;

    let mut prices = Vec::new();
    let mut blank_closes = 0;
    for result in rdr.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        let date_cell = row.get(date_idx).ok_or(DataError::MissingField {
            column: DATE_COLUMN,
            line,
        })?;
        let date = parse_date(date_cell).ok_or_else(|| DataError::DateParse {
            value: date_cell.to_string(),
            line,
        })?;

        // a short row has no close at all; that is a gap, not a malformed file
        let close = row.get(close_idx).map(parse_close).unwrap_or(f64::NAN);
        if close.is_nan() {
            debug!("No usable close on line {} ({})", line, date);
            blank_closes += 1;
        }

        prices.push(PriceRecord::new(date, close));
    }

    if blank_closes > 0 {
        warn!("{} rows had a blank or non-numeric close", blank_closes);
    }
    info!("Loaded {} price rows", prices.len());
    Ok(prices)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Writes `Date,Return` rows. The file is staged next to `path` and renamed
/// into place, so a failure never leaves a truncated output behind.
pub fn write_returns<P: AsRef<Path>>(path: P, records: &[ReturnRecord]) -> Result<()> {
    let path = path.as_ref();
    let staging = staging_path(path);

    let written = (|| -> Result<()> {
        let mut wtr = Writer::from_path(&staging)?;
        // serialize() only emits the header alongside the first record
        if records.is_empty() {
            wtr.write_record([DATE_COLUMN, "Return"])?;
        }
        for record in records {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&staging);
        return Err(e);
    }

    fs::rename(&staging, path)?;
    info!("Wrote {} returns to {}", records.len(), path.display());
    Ok(())
}

/// Reads back a file produced by [`write_returns`].
pub fn read_returns<P: AsRef<Path>>(path: P) -> Result<Vec<ReturnRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: ReturnRecord = result?;
        records.push(record);
    }
    Ok(records)
}
