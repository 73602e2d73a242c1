//! Per-dimension order index
//!
//! Keeps one sorted set of orders per (primary currency, classification
//! value) pair. Sets are created on first insert and never torn down; an
//! empty set is a valid, queryable state. Lookups for pairs that were never
//! used behave like empty sets and do not allocate.
//!
//! Uses BTreeMap keyed by [`OrderKey`] so iteration is deterministic and
//! starts at the cheapest order.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::Arc;

use types::market::Currency;
use types::order::{MarketOrder, OrderKey};

type OrderSet = BTreeMap<OrderKey, Arc<MarketOrder>>;

/// Sorted order sets for one classification axis
#[derive(Debug, Clone)]
pub struct ClassifiedIndex<C> {
    sets: HashMap<(Currency, C), OrderSet>,
}

impl<C: Copy + Eq + Hash> ClassifiedIndex<C> {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            sets: HashMap::new(),
        }
    }

    /// Insert an order under (currency, classification)
    ///
    /// Returns false if an order with the same key was already present.
    pub fn insert(&mut self, currency: Currency, classification: C, order: Arc<MarketOrder>) -> bool {
        self.sets
            .entry((currency, classification))
            .or_default()
            .insert(order.sort_key(), order)
            .is_none()
    }

    /// Remove the order with `key` from (currency, classification)
    pub fn remove(
        &mut self,
        currency: Currency,
        classification: C,
        key: &OrderKey,
    ) -> Option<Arc<MarketOrder>> {
        self.sets
            .get_mut(&(currency, classification))
            .and_then(|set| set.remove(key))
    }

    /// Cheapest order, i.e. the one setting the marginal price
    pub fn first(&self, currency: Currency, classification: C) -> Option<&Arc<MarketOrder>> {
        self.sets
            .get(&(currency, classification))
            .and_then(|set| set.first_key_value())
            .map(|(_, order)| order)
    }

    /// Orders in ascending price order
    pub fn orders(
        &self,
        currency: Currency,
        classification: C,
    ) -> impl Iterator<Item = &Arc<MarketOrder>> + '_ {
        self.sets
            .get(&(currency, classification))
            .into_iter()
            .flat_map(|set| set.values())
    }

    /// Independent copy of one set, ascending
    pub fn snapshot(&self, currency: Currency, classification: C) -> Vec<Arc<MarketOrder>> {
        self.orders(currency, classification).cloned().collect()
    }

    pub fn sum_amount(&self, currency: Currency, classification: C) -> f64 {
        self.orders(currency, classification)
            .map(|order| order.amount())
            .sum()
    }

    pub fn contains(&self, currency: Currency, classification: C, key: &OrderKey) -> bool {
        self.sets
            .get(&(currency, classification))
            .is_some_and(|set| set.contains_key(key))
    }

    /// Number of orders under (currency, classification)
    pub fn len(&self, currency: Currency, classification: C) -> usize {
        self.sets
            .get(&(currency, classification))
            .map_or(0, |set| set.len())
    }

    /// Number of orders across every set
    pub fn total_len(&self) -> usize {
        self.sets.values().map(|set| set.len()).sum()
    }

    /// Number of (currency, classification) sets created so far
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }
}

impl<C: Copy + Eq + Hash> Default for ClassifiedIndex<C> {
    fn default() -> Self {
        Self::new()
    }
}
