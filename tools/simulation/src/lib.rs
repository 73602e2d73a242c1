//! Market Simulation
//!
//! Drives a shared order book with producer and household agents acting
//! concurrently, one tick at a time.
//!
//! # Modules
//! - `config`: Run configuration, JSON loading and validation
//! - `bots`: Producer and household agents
//! - `market`: Tick loop over the shared book
//! - `metrics`: Counters and per-tick market reports

pub mod config;
pub mod bots;
pub mod market;
pub mod metrics;

use thiserror::Error;
use types::errors::OrderError;

pub use config::SimulationConfig;
pub use market::MarketSim;
pub use metrics::SimMetrics;

/// Crate version constant
pub const VERSION: &str = "1.0.0";

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Malformed configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Order book rejected an agent operation: {0}")]
    Order(#[from] OrderError),
}
