//! Simulation metrics and per-tick market reports

use serde::{Deserialize, Serialize};
use types::market::GoodType;

use crate::bots::{ProducerActivity, Purchase};

/// State of one good's market at the end of a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodQuote {
    pub good: GoodType,
    /// Cheapest offer left, `None` when the market is empty
    pub marginal_price: Option<f64>,
    pub open_offers: usize,
    pub offered_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub live_orders: usize,
    pub quotes: Vec<GoodQuote>,
}

/// Aggregated simulation metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimMetrics {
    pub ticks_run: u64,
    pub offers_placed: u64,
    pub offers_repriced: u64,
    pub fills: u64,
    pub partial_fills: u64,
    pub units_sold: f64,
    pub turnover: f64,
    pub producers_exited: u64,
    pub orders_purged: u64,
    pub reports: Vec<TickReport>,
}

impl SimMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_production(&mut self, activity: &ProducerActivity) {
        self.offers_placed += activity.offers_placed;
        self.offers_repriced += activity.offers_repriced;
    }

    pub fn record_purchase(&mut self, purchase: &Purchase) {
        self.fills += purchase.fills;
        self.partial_fills += purchase.partial_fills;
        self.units_sold += purchase.units;
        self.turnover += purchase.spent;
    }

    pub fn record_exit(&mut self, orders_purged: usize) {
        self.producers_exited += 1;
        self.orders_purged += orders_purged as u64;
    }

    /// Average price paid per unit over the whole run
    pub fn average_price(&self) -> Option<f64> {
        (self.units_sold > 0.0).then(|| self.turnover / self.units_sold)
    }

    pub fn summary(&self) -> String {
        format!(
            "Ticks: {} | Offers: {} | Repriced: {} | Fills: {} | Partial: {} | Units: {:.2} | Turnover: {:.2} | Exits: {}",
            self.ticks_run,
            self.offers_placed,
            self.offers_repriced,
            self.fills,
            self.partial_fills,
            self.units_sold,
            self.turnover,
            self.producers_exited,
        )
    }

    /// Export metrics as pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
