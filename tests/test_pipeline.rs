use approx::assert_relative_eq;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use sp500_returns::config::Config;
use sp500_returns::services::pipeline;
use sp500_returns::services::prices::{read_prices, read_returns, write_returns, DataError};
use sp500_returns::{compute_returns, InputError, ReturnRecord};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data")
        .join(name)
}

fn config_for(input: &str, dir: &TempDir) -> Config {
    Config {
        input_path: fixture(input),
        output_path: dir.path().join("sp500_returns.csv"),
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_read_prices_ignores_extra_columns() {
    let prices = read_prices(fixture("sample_prices.csv")).expect("Failed to load test data");

    assert_eq!(prices.len(), 5);
    assert_eq!(prices[0].date, d(2020, 1, 2));
    assert_relative_eq!(prices[0].close, 3257.850098, epsilon = 1e-9);
    assert_eq!(prices[4].date, d(2020, 1, 8));
}

#[test]
fn test_blank_close_loads_as_gap() {
    let prices = read_prices(fixture("gapped_prices.csv")).unwrap();

    assert_eq!(prices.len(), 4);
    assert!(prices[2].close.is_nan());
    assert!(!prices[2].has_valid_close());
}

#[test]
fn test_missing_close_column() {
    let err = read_prices(fixture("no_close_column.csv")).unwrap_err();
    assert!(matches!(err, DataError::MissingColumn(c) if c == "Close"));
}

#[test]
fn test_bad_date_is_fatal() {
    let err = read_prices(fixture("bad_date_prices.csv")).unwrap_err();
    assert!(matches!(err, DataError::DateParse { ref value, .. } if value == "not-a-date"));
}

#[test]
fn test_missing_input_file() {
    let err = read_prices(fixture("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, DataError::Csv(_)));
}

#[test]
fn test_pipeline_writes_returns() {
    let dir = TempDir::new().unwrap();
    let config = config_for("sample_prices.csv", &dir);

    let summary = pipeline::run(&config).unwrap();

    assert_eq!(summary.count, 4);
    assert_eq!(summary.skipped, 0);

    let written = read_returns(&config.output_path).unwrap();
    assert_eq!(written.len(), 4);
    assert_eq!(written[0].date, d(2020, 1, 3));
    assert_relative_eq!(
        written[0].value,
        3234.850098 / 3257.850098 - 1.0,
        epsilon = 1e-12
    );
    assert_eq!(written[3].date, d(2020, 1, 8));

    let header = fs::read_to_string(&config.output_path).unwrap();
    assert!(header.starts_with("Date,Return\n"));
}

#[test]
fn test_pipeline_skips_gaps() {
    let dir = TempDir::new().unwrap();
    let config = config_for("gapped_prices.csv", &dir);

    let summary = pipeline::run(&config).unwrap();

    assert_eq!(summary.count, 1);
    assert_eq!(summary.skipped, 2);

    let written = read_returns(&config.output_path).unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].date, d(2020, 1, 2));
    assert_relative_eq!(written[0].value, 0.05, epsilon = 1e-12);
}

#[test]
fn test_unsorted_input_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config_for("unsorted_prices.csv", &dir);

    let err = pipeline::run(&config).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::OutOfOrder { .. })
    ));
    assert!(!config.output_path.exists());
}

#[test]
fn test_duplicate_dates_write_nothing() {
    let dir = TempDir::new().unwrap();
    let config = config_for("duplicate_prices.csv", &dir);

    let err = pipeline::run(&config).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<InputError>(),
        Some(InputError::DuplicateDate { .. })
    ));
    assert!(!config.output_path.exists());
}

#[test]
fn test_failed_run_keeps_previous_output() {
    let dir = TempDir::new().unwrap();
    let config = config_for("duplicate_prices.csv", &dir);
    fs::write(&config.output_path, "Date,Return\n2019-12-31,0.01\n").unwrap();

    assert!(pipeline::run(&config).is_err());

    let kept = read_returns(&config.output_path).unwrap();
    assert_eq!(kept, vec![ReturnRecord::new(d(2019, 12, 31), 0.01)]);
}

#[test]
fn test_returns_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("round_trip.csv");
    let prices = read_prices(fixture("sample_prices.csv")).unwrap();
    let computed = compute_returns(&prices).unwrap();

    write_returns(&path, &computed.records).unwrap();
    let reread = read_returns(&path).unwrap();

    assert_eq!(reread.len(), computed.records.len());
    for (original, parsed) in computed.records.iter().zip(&reread) {
        assert_eq!(original.date, parsed.date);
        assert_relative_eq!(original.value, parsed.value, epsilon = 1e-9);
    }
    assert!(!dir.path().join("round_trip.csv.tmp").exists());
}

#[test]
fn test_empty_returns_still_have_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");

    write_returns(&path, &[]).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "Date,Return\n");
    assert!(read_returns(&path).unwrap().is_empty());
}
