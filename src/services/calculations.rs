// src/services/calculations.rs
use chrono::NaiveDate;
use log::{debug, warn};
use thiserror::Error;

use crate::models::{PriceRecord, ReturnRecord};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("price series is not ascending: {current} at row {index} follows {previous}")]
    OutOfOrder {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
    #[error("duplicate date {date} at row {index}")]
    DuplicateDate { index: usize, date: NaiveDate },
}

/// Output of [`compute_returns`]: the emitted returns plus how many adjacent
/// pairs were dropped as data gaps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedReturns {
    pub records: Vec<ReturnRecord>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnsSummary {
    pub count: usize,
    pub skipped: usize,
    pub mean: f64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

fn calculate_return(prev_close: f64, curr_close: f64) -> f64 {
    curr_close / prev_close - 1.0
}

fn calculate_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn verify_ordering(series: &[PriceRecord]) -> Result<(), InputError> {
    for (i, pair) in series.windows(2).enumerate() {
        let (prev, curr) = (pair[0].date, pair[1].date);
        if curr == prev {
            return Err(InputError::DuplicateDate {
                index: i + 1,
                date: curr,
            });
        }
        if curr < prev {
            return Err(InputError::OutOfOrder {
                index: i + 1,
                previous: prev,
                current: curr,
            });
        }
    }
    Ok(())
}

/// Computes simple returns `close[t] / close[t-1] - 1` over adjacent rows.
///
/// The series must be strictly ascending by date. A pair where either close
/// is zero, negative or non-finite is skipped and counted, never filled.
pub fn compute_returns(series: &[PriceRecord]) -> Result<ComputedReturns, InputError> {
    verify_ordering(series)?;

    let mut records = Vec::with_capacity(series.len().saturating_sub(1));
    let mut skipped = 0;

    for pair in series.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if prev.has_valid_close() && curr.has_valid_close() {
            records.push(ReturnRecord::new(
                curr.date,
                calculate_return(prev.close, curr.close),
            ));
        } else {
            debug!(
                "Skipping {} -> {}: invalid close ({} / {})",
                prev.date, curr.date, prev.close, curr.close
            );
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!("Skipped {} price pairs with missing or invalid closes", skipped);
    }

    Ok(ComputedReturns { records, skipped })
}

pub fn summarize(computed: &ComputedReturns) -> ReturnsSummary {
    let values: Vec<f64> = computed.records.iter().map(|r| r.value).collect();

    ReturnsSummary {
        count: computed.records.len(),
        skipped: computed.skipped,
        mean: calculate_average(&values),
        first_date: computed.records.first().map(|r| r.date),
        last_date: computed.records.last().map(|r| r.date),
    }
}
