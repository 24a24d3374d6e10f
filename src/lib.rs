// src/lib.rs

pub mod config;
pub mod models;
pub mod services;

pub use models::{PriceRecord, ReturnRecord};
pub use services::calculations::{compute_returns, ComputedReturns, InputError};
