//! Per-agent order index
//!
//! Answers "which orders does this agent have open" and backs the bulk
//! removal paths used on agent teardown. Also records the owner of every
//! live order so the book can find an order's resident copy by id alone.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use types::ids::{AgentId, OrderId};
use types::order::MarketOrder;

#[derive(Debug, Clone, Default)]
pub struct AgentIndex {
    /// agent → live orders, enumerated in id order
    by_agent: HashMap<AgentId, BTreeMap<OrderId, Arc<MarketOrder>>>,
    /// order → owning agent
    owners: HashMap<OrderId, AgentId>,
}

impl AgentIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a live order under its offeror
    ///
    /// Returns false if the id is already live.
    pub fn insert(&mut self, order: Arc<MarketOrder>) -> bool {
        if self.owners.contains_key(&order.id()) {
            return false;
        }
        self.owners.insert(order.id(), order.offeror());
        self.by_agent
            .entry(order.offeror())
            .or_default()
            .insert(order.id(), order);
        true
    }

    /// Drop a live order, returning the resident copy
    ///
    /// An agent's entry is dropped together with its last order so exited
    /// agents leave nothing behind.
    pub fn remove(&mut self, order_id: OrderId) -> Option<Arc<MarketOrder>> {
        let agent = self.owners.remove(&order_id)?;
        let orders = self.by_agent.get_mut(&agent)?;
        let removed = orders.remove(&order_id);
        if orders.is_empty() {
            self.by_agent.remove(&agent);
        }
        removed
    }

    /// Resident copy of a live order
    pub fn get(&self, order_id: OrderId) -> Option<&Arc<MarketOrder>> {
        let agent = self.owners.get(&order_id)?;
        self.by_agent.get(agent)?.get(&order_id)
    }

    pub fn contains(&self, order_id: OrderId) -> bool {
        self.owners.contains_key(&order_id)
    }

    /// Live orders of `agent` in id order
    pub fn orders_of(&self, agent: AgentId) -> impl Iterator<Item = &Arc<MarketOrder>> + '_ {
        self.by_agent
            .get(&agent)
            .into_iter()
            .flat_map(|orders| orders.values())
    }

    pub fn order_count(&self, agent: AgentId) -> usize {
        self.by_agent.get(&agent).map_or(0, |orders| orders.len())
    }

    /// Total number of live orders
    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Number of agents with at least one live order
    pub fn agent_count(&self) -> usize {
        self.by_agent.len()
    }
}
