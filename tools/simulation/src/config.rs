//! Simulation configuration
//!
//! Loaded from JSON or built from defaults; validated before a run starts.

use std::collections::HashSet;

use order_book::OrderBookConfig;
use serde::{Deserialize, Serialize};
use types::market::{Currency, GoodType};

use crate::SimulationError;

/// Configuration for a market simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed for every RNG in the run
    pub seed: u64,
    /// Number of ticks to simulate
    pub ticks: u64,
    /// Producers selling each good
    pub producers_per_good: usize,
    /// Households buying every good
    pub households: usize,
    /// Threads used for the parallel agent phases
    pub worker_threads: usize,
    /// Currency all goods are quoted in
    pub currency: Currency,
    /// Goods traded on the market
    pub goods: Vec<GoodType>,
    /// Centre of the producers' asking prices
    pub reference_price: f64,
    /// Relative spread of asking prices around the reference (0.1 = ±10%)
    pub price_spread: f64,
    /// Units each producer offers per tick
    pub output_per_tick: f64,
    /// Money each household spends per tick, split evenly across goods
    pub household_budget: f64,
    /// Relative price cut applied to offers left unsold from earlier ticks
    pub markdown: f64,
    /// Chance per tick that a producer leaves the market
    pub exit_probability: f64,
    /// Order book settings
    pub book: OrderBookConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 20,
            producers_per_good: 8,
            households: 32,
            worker_threads: 4,
            currency: Currency::Euro,
            goods: vec![GoodType::Wheat, GoodType::Clothing, GoodType::KiloWatt],
            reference_price: 10.0,
            price_spread: 0.2,
            output_per_tick: 5.0,
            household_budget: 30.0,
            markdown: 0.05,
            exit_probability: 0.02,
            book: OrderBookConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SimulationError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        let invalid = |reason: &str| Err(SimulationError::InvalidConfig(reason.to_string()));

        if self.worker_threads == 0 {
            return invalid("worker_threads must be at least 1");
        }
        if self.goods.is_empty() {
            return invalid("at least one good must be traded");
        }
        let mut seen = HashSet::new();
        if !self.goods.iter().all(|good| seen.insert(*good)) {
            return invalid("goods must not be listed twice");
        }
        if !(self.reference_price.is_finite() && self.reference_price > 0.0) {
            return invalid("reference_price must be positive");
        }
        if !(0.0..1.0).contains(&self.price_spread) {
            return invalid("price_spread must be in [0, 1)");
        }
        if !(self.output_per_tick.is_finite() && self.output_per_tick >= 0.0) {
            return invalid("output_per_tick must be non-negative");
        }
        if !(self.household_budget.is_finite() && self.household_budget >= 0.0) {
            return invalid("household_budget must be non-negative");
        }
        if !(0.0..1.0).contains(&self.markdown) {
            return invalid("markdown must be in [0, 1)");
        }
        if !(0.0..=1.0).contains(&self.exit_probability) {
            return invalid("exit_probability must be in [0, 1]");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use order_book::ResavePolicy;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json(
            r#"{"ticks": 3, "goods": ["COAL"], "book": {"resave_policy": "IGNORE"}}"#,
        )
        .unwrap();

        assert_eq!(config.ticks, 3);
        assert_eq!(config.goods, vec![GoodType::Coal]);
        assert_eq!(config.book.resave_policy, ResavePolicy::Ignore);
        assert_eq!(config.households, SimulationConfig::default().households);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SimulationConfig::from_json(r#"{"worker_threads": 0}"#).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));

        let err = SimulationConfig::from_json(r#"{"goods": []}"#).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));

        let err = SimulationConfig::from_json(r#"{"markdown": 1.5}"#).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));

        let err = SimulationConfig::from_json(r#"{"goods": ["WHEAT", "COAL", "WHEAT"]}"#).unwrap_err();
        assert!(matches!(err, SimulationError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = SimulationConfig::from_json("{ticks").unwrap_err();
        assert!(matches!(err, SimulationError::Config(_)));
    }
}
