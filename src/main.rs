use anyhow::Result;
use env_logger;
use log::info;

use sp500_returns::config::Config;
use sp500_returns::services::pipeline;

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Computing S&P 500 returns...");

    let config = Config::from_env();
    info!("Input: {}", config.input_path.display());
    info!("Output: {}", config.output_path.display());

    pipeline::run(&config)?;

    info!("Done.");
    Ok(())
}
