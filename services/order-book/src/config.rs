//! Order book configuration

use serde::{Deserialize, Serialize};

/// What `save` does with an order whose id is already live in the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResavePolicy {
    /// Fail with `OrderError::AlreadyLive`
    #[default]
    Reject,
    /// Return the resident order and change nothing
    Ignore,
}

/// Configuration for the order book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderBookConfig {
    pub resave_policy: ResavePolicy,
}

impl OrderBookConfig {
    pub fn with_resave_policy(mut self, resave_policy: ResavePolicy) -> Self {
        self.resave_policy = resave_policy;
        self
    }
}
