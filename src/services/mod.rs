// src/services/mod.rs
pub mod calculations;
pub mod pipeline;
pub mod prices;
