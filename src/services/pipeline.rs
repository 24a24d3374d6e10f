// src/services/pipeline.rs
use anyhow::{Context, Result};
use log::info;

use crate::config::Config;
use crate::services::calculations::{compute_returns, summarize, ReturnsSummary};
use crate::services::prices::{read_prices, write_returns};

/// Reads the configured price history, computes daily returns and writes
/// them out. Nothing is written unless the whole computation succeeds.
pub fn run(config: &Config) -> Result<ReturnsSummary> {
    let prices = read_prices(&config.input_path).with_context(|| {
        format!("Failed to load prices from {}", config.input_path.display())
    })?;

    let computed = compute_returns(&prices).context("Price history failed validation")?;

    write_returns(&config.output_path, &computed.records).with_context(|| {
        format!("Failed to write returns to {}", config.output_path.display())
    })?;

    let summary = summarize(&computed);
    match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => info!(
            "{} returns from {} to {} (mean {:.6}, {} pairs skipped)",
            summary.count, first, last, summary.mean, summary.skipped
        ),
        _ => info!("No returns computed ({} pairs skipped)", summary.skipped),
    }

    Ok(summary)
}
