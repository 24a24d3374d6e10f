// src/config.rs
use dotenv::dotenv;
use log::{info, warn};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_INPUT_FILE: &str = "SPX.csv";
pub const DEFAULT_OUTPUT_FILE: &str = "sp500_returns.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
}

impl Config {
    /// Paths relative to `root`, using the default file names.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Config {
            input_path: root.join(DEFAULT_INPUT_FILE),
            output_path: root.join(DEFAULT_OUTPUT_FILE),
        }
    }

    /// Loads `.env` if present, then resolves paths from the environment.
    ///
    /// `SP500_DATA_ROOT` sets the directory the default file names live in;
    /// `SP500_INPUT_PATH` and `SP500_OUTPUT_PATH` override either file.
    pub fn from_env() -> Self {
        dotenv().ok();

        let root = env::var("SP500_DATA_ROOT").map(PathBuf::from).unwrap_or_else(|_| {
            info!("SP500_DATA_ROOT not set, using the working directory");
            PathBuf::from(".")
        });
        let defaults = Config::with_root(&root);

        let input_path = env::var("SP500_INPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.input_path);
        let output_path = env::var("SP500_OUTPUT_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.output_path);

        if input_path == output_path {
            warn!("Input and output paths are identical: {}", input_path.display());
        }

        Config {
            input_path,
            output_path,
        }
    }
}
