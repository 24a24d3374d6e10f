// src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day from the price history.
///
/// A missing or unparseable close is carried as `f64::NAN` so that the
/// calculation can treat it as a data gap instead of failing the load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub close: f64,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        PriceRecord { date, close }
    }

    /// A close is usable when it is finite and strictly positive.
    pub fn has_valid_close(&self) -> bool {
        self.close.is_finite() && self.close > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Return")]
    pub value: f64,
}

impl ReturnRecord {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        ReturnRecord { date, value }
    }
}
