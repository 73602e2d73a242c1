//! Unsynchronised book state
//!
//! Owns the three classified indices and the agent index and keeps them
//! consistent: every live order sits in exactly the classified index implied
//! by its classification and in the agent index under its offeror.
//! [`crate::OrderBook`] wraps this in its single mutex.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use types::ids::OrderId;
use types::market::{Currency, GoodType, PropertyClass};
use types::order::MarketOrder;

use super::axis::sealed::Sealed;
use super::axis::ClassificationAxis;
use super::{AgentIndex, ClassifiedIndex};

/// Counters describing the book's current contents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BookStats {
    pub live_orders: usize,
    pub agents: usize,
    pub good_type_orders: usize,
    pub currency_orders: usize,
    pub property_orders: usize,
    pub unclassified_orders: usize,
    pub good_type_sets: usize,
    pub currency_sets: usize,
    pub property_sets: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BookState {
    good_types: ClassifiedIndex<GoodType>,
    currencies: ClassifiedIndex<Currency>,
    property_classes: ClassifiedIndex<PropertyClass>,
    agents: AgentIndex,
    unclassified: usize,
}

impl Sealed for GoodType {
    fn index(state: &BookState) -> &ClassifiedIndex<Self> {
        &state.good_types
    }

    fn index_mut(state: &mut BookState) -> &mut ClassifiedIndex<Self> {
        &mut state.good_types
    }
}

impl Sealed for Currency {
    fn index(state: &BookState) -> &ClassifiedIndex<Self> {
        &state.currencies
    }

    fn index_mut(state: &mut BookState) -> &mut ClassifiedIndex<Self> {
        &mut state.currencies
    }
}

impl Sealed for PropertyClass {
    fn index(state: &BookState) -> &ClassifiedIndex<Self> {
        &state.property_classes
    }

    fn index_mut(state: &mut BookState) -> &mut ClassifiedIndex<Self> {
        &mut state.property_classes
    }
}

impl BookState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The classified index for axis `C`
    pub fn index<C: ClassificationAxis>(&self) -> &ClassifiedIndex<C> {
        C::index(self)
    }

    pub fn agents(&self) -> &AgentIndex {
        &self.agents
    }

    /// Resident copy of a live order
    pub fn get(&self, order_id: OrderId) -> Option<&Arc<MarketOrder>> {
        self.agents.get(order_id)
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.agents.contains(order_id)
    }

    /// Fan an order out into its classified index and the agent index
    ///
    /// Returns false, touching nothing, if the id is already live.
    pub fn insert(&mut self, order: Arc<MarketOrder>) -> bool {
        if !self.agents.insert(Arc::clone(&order)) {
            return false;
        }
        self.link::<GoodType>(&order);
        self.link::<Currency>(&order);
        self.link::<PropertyClass>(&order);
        if order.classification().is_none() {
            self.unclassified += 1;
        }
        true
    }

    /// Remove a live order from every index it was inserted into
    ///
    /// Index entries are located from the resident copy, so a stale or
    /// modified copy of the order held by the caller still removes the right
    /// entries.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Arc<MarketOrder>> {
        let resident = self.agents.remove(order_id)?;
        self.unlink::<GoodType>(&resident);
        self.unlink::<Currency>(&resident);
        self.unlink::<PropertyClass>(&resident);
        if resident.classification().is_none() {
            self.unclassified -= 1;
        }
        Some(resident)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Counters read straight from each index, so a missing index entry
    /// shows up as a mismatch against `live_orders`
    pub fn stats(&self) -> BookStats {
        BookStats {
            live_orders: self.agents.len(),
            agents: self.agents.agent_count(),
            good_type_orders: self.good_types.total_len(),
            currency_orders: self.currencies.total_len(),
            property_orders: self.property_classes.total_len(),
            unclassified_orders: self.unclassified,
            good_type_sets: self.good_types.set_count(),
            currency_sets: self.currencies.set_count(),
            property_sets: self.property_classes.set_count(),
        }
    }

    fn link<C: ClassificationAxis>(&mut self, order: &Arc<MarketOrder>) {
        if let Some(classification) = C::of(order) {
            C::index_mut(self).insert(order.currency(), classification, Arc::clone(order));
        }
    }

    fn unlink<C: ClassificationAxis>(&mut self, order: &MarketOrder) {
        if let Some(classification) = C::of(order) {
            C::index_mut(self).remove(order.currency(), classification, &order.sort_key());
        }
    }
}
