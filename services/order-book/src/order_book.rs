//! Order book core
//!
//! [`OrderBook`] guards a [`BookState`] with one mutex. Every operation, read
//! or write, runs inside that single exclusion domain, so no caller can ever
//! observe an order present in some indices and missing from others.
//!
//! The book is built explicitly by the simulation's composition root and
//! shared as `Arc<OrderBook>`; there is no global instance.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, trace, warn};
use types::errors::OrderError;
use types::ids::{AgentId, OrderId};
use types::market::Currency;
use types::order::MarketOrder;

use crate::book::{BookState, BookStats, ClassificationAxis};
use crate::config::{OrderBookConfig, ResavePolicy};

/// Thread-safe market order book
#[derive(Debug)]
pub struct OrderBook {
    config: OrderBookConfig,
    state: Mutex<BookState>,
}

/// Units taken from one order by [`OrderBook::take`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub order_id: OrderId,
    /// Price of the order at the moment of the take
    pub price_per_unit: f64,
    pub amount: f64,
    /// The order was emptied and is no longer live
    pub exhausted: bool,
}

impl Fill {
    pub fn value(&self) -> f64 {
        self.price_per_unit * self.amount
    }
}

/// Live view over one index, holding the book's lock
///
/// Other threads block on the book while the view exists. Calling back into
/// the same book from the holding thread deadlocks; use
/// [`OrderBook::iter_snapshot`] when orders are deleted while iterating.
pub struct LiveOrders<'a, C> {
    state: MutexGuard<'a, BookState>,
    currency: Currency,
    classification: C,
}

impl<'a, C: ClassificationAxis> LiveOrders<'a, C> {
    /// Orders in ascending price order, ties by id
    pub fn iter(&self) -> impl Iterator<Item = &Arc<MarketOrder>> + '_ {
        self.state
            .index::<C>()
            .orders(self.currency, self.classification)
    }

    pub fn len(&self) -> usize {
        self.state
            .index::<C>()
            .len(self.currency, self.classification)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl OrderBook {
    /// Create an empty book
    pub fn new(config: OrderBookConfig) -> Self {
        info!(resave_policy = ?config.resave_policy, "OrderBook initialized");

        Self {
            config,
            state: Mutex::new(BookState::new()),
        }
    }

    /// Create an empty book with default configuration
    pub fn with_defaults() -> Self {
        Self::new(OrderBookConfig::default())
    }

    pub fn config(&self) -> &OrderBookConfig {
        &self.config
    }

    // Every mutation completes before anything that could panic, so a
    // poisoned lock still guards consistent indices.
    fn lock(&self) -> MutexGuard<'_, BookState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Place an order in every index implied by its classification and in
    /// its offeror's agent index
    ///
    /// Invalid orders are rejected before any index is touched. Saving an
    /// order whose id is already live follows the configured
    /// [`ResavePolicy`].
    pub fn save(&self, order: impl Into<Arc<MarketOrder>>) -> Result<Arc<MarketOrder>, OrderError> {
        let order = order.into();

        if let Err(err) = order.validate() {
            warn!(
                order_id = %order.id(),
                agent = %order.offeror(),
                error = %err,
                "rejected order"
            );
            return Err(err);
        }

        let mut state = self.lock();

        if let Some(resident) = state.get(order.id()) {
            return match self.config.resave_policy {
                ResavePolicy::Reject => {
                    warn!(order_id = %order.id(), "order already live");
                    Err(OrderError::AlreadyLive {
                        order_id: order.id(),
                    })
                }
                ResavePolicy::Ignore => Ok(Arc::clone(resident)),
            };
        }

        state.insert(Arc::clone(&order));

        debug!(
            order_id = %order.id(),
            agent = %order.offeror(),
            currency = %order.currency(),
            classification = ?order.classification(),
            price = order.price_per_unit(),
            amount = order.amount(),
            "order saved"
        );

        Ok(order)
    }

    /// Remove an order from every index it was inserted into
    ///
    /// Deleting an order that is not live is a no-op. Returns whether
    /// anything was removed.
    pub fn delete(&self, order: &MarketOrder) -> bool {
        self.delete_by_id(order.id())
    }

    pub fn delete_by_id(&self, order_id: OrderId) -> bool {
        let removed = self.lock().remove(order_id);
        if let Some(order) = &removed {
            debug!(
                order_id = %order_id,
                agent = %order.offeror(),
                "order deleted"
            );
        }
        removed.is_some()
    }

    /// Remove every live order of `agent`
    ///
    /// Used when an agent leaves the simulation. Returns the number of
    /// orders removed; an agent without orders is not an error.
    pub fn delete_all_orders(&self, agent: AgentId) -> usize {
        let mut state = self.lock();
        let order_ids: Vec<OrderId> = state.agents().orders_of(agent).map(|o| o.id()).collect();
        let removed = order_ids
            .into_iter()
            .filter(|order_id| state.remove(*order_id).is_some())
            .count();

        if removed > 0 {
            info!(agent = %agent, removed, "removed all orders of agent");
        }
        removed
    }

    /// Remove the orders of `agent` quoted in `currency` and classified as
    /// `classification`, leaving the agent's other orders in place
    pub fn delete_all_orders_for<C: ClassificationAxis>(
        &self,
        agent: AgentId,
        currency: Currency,
        classification: C,
    ) -> usize {
        let mut state = self.lock();
        let order_ids: Vec<OrderId> = state
            .agents()
            .orders_of(agent)
            .filter(|o| o.currency() == currency && C::of(o) == Some(classification))
            .map(|o| o.id())
            .collect();
        let removed = order_ids
            .into_iter()
            .filter(|order_id| state.remove(*order_id).is_some())
            .count();

        if removed > 0 {
            info!(
                agent = %agent,
                currency = %currency,
                axis = C::AXIS,
                classification = %classification,
                removed,
                "removed classified orders of agent"
            );
        }
        removed
    }

    /// Move a live order to a new price, keeping its id
    ///
    /// Done as remove-then-reinsert under one lock so the sorted indices
    /// never hold an order whose key changed in place.
    pub fn reprice(&self, order: &MarketOrder, price_per_unit: f64) -> Result<Arc<MarketOrder>, OrderError> {
        self.amend(order.id(), |resident| resident.with_price(price_per_unit))
    }

    /// Change the remaining amount of a live order, keeping its id
    pub fn set_amount(&self, order: &MarketOrder, amount: f64) -> Result<Arc<MarketOrder>, OrderError> {
        self.amend(order.id(), |resident| resident.with_amount(amount))
    }

    /// Take up to `units` from a live order as it currently sits in the book
    ///
    /// The order's amount is reduced by what was taken; an order taken down
    /// to zero is removed from every index. Returns `None` if the order is
    /// not live.
    pub fn take(&self, order: &MarketOrder, units: f64) -> Result<Option<Fill>, OrderError> {
        if !units.is_finite() || units < 0.0 {
            return Err(OrderError::InvalidAmount(format!(
                "cannot take {} units from order {}",
                units,
                order.id()
            )));
        }

        let order_id = order.id();
        let mut state = self.lock();
        let Some(resident) = state.remove(order_id) else {
            return Ok(None);
        };

        let taken = units.min(resident.amount());
        let left = resident.amount() - taken;
        let exhausted = left <= 0.0;
        if !exhausted {
            state.insert(Arc::new(resident.with_amount(left)));
        }

        debug!(
            order_id = %order_id,
            agent = %resident.offeror(),
            taken,
            left,
            "order filled"
        );
        Ok(Some(Fill {
            order_id,
            price_per_unit: resident.price_per_unit(),
            amount: taken,
            exhausted,
        }))
    }

    fn amend(
        &self,
        order_id: OrderId,
        change: impl FnOnce(&MarketOrder) -> MarketOrder,
    ) -> Result<Arc<MarketOrder>, OrderError> {
        let mut state = self.lock();
        let resident = state
            .get(order_id)
            .ok_or(OrderError::NotLive { order_id })?;

        let amended = Arc::new(change(resident));
        amended.validate()?;

        state.remove(order_id);
        state.insert(Arc::clone(&amended));

        debug!(
            order_id = %order_id,
            price = amended.price_per_unit(),
            amount = amended.amount(),
            "order amended"
        );
        Ok(amended)
    }

    // ── Queries ─────────────────────────────────────────────────────

    /// Price of the cheapest live order, or NaN if there is none
    pub fn find_marginal_price<C: ClassificationAxis>(&self, currency: Currency, classification: C) -> f64 {
        let price = self
            .marginal_order(currency, classification)
            .map_or(f64::NAN, |order| order.price_per_unit());
        trace!(currency = %currency, classification = %classification, price, "marginal price");
        price
    }

    /// The cheapest live order
    pub fn marginal_order<C: ClassificationAxis>(
        &self,
        currency: Currency,
        classification: C,
    ) -> Option<Arc<MarketOrder>> {
        self.lock()
            .index::<C>()
            .first(currency, classification)
            .cloned()
    }

    /// Live view over the index, ascending price
    pub fn iter<C: ClassificationAxis>(&self, currency: Currency, classification: C) -> LiveOrders<'_, C> {
        LiveOrders {
            state: self.lock(),
            currency,
            classification,
        }
    }

    /// Copy of the index taken atomically, ascending price
    ///
    /// Safe to iterate while the book is mutated, including deleting the
    /// iterated orders.
    pub fn iter_snapshot<C: ClassificationAxis>(
        &self,
        currency: Currency,
        classification: C,
    ) -> Vec<Arc<MarketOrder>> {
        self.lock().index::<C>().snapshot(currency, classification)
    }

    /// Sum of `amount` over the index; 0 when empty
    pub fn sum_amount<C: ClassificationAxis>(&self, currency: Currency, classification: C) -> f64 {
        self.lock().index::<C>().sum_amount(currency, classification)
    }

    pub fn order_count<C: ClassificationAxis>(&self, currency: Currency, classification: C) -> usize {
        self.lock().index::<C>().len(currency, classification)
    }

    /// Live orders of `agent` in id order
    pub fn orders_of(&self, agent: AgentId) -> Vec<Arc<MarketOrder>> {
        self.lock().agents().orders_of(agent).cloned().collect()
    }

    /// Live orders of `agent` quoted in `currency` and classified as
    /// `classification`, ascending price
    pub fn find_orders<C: ClassificationAxis>(
        &self,
        agent: AgentId,
        currency: Currency,
        classification: C,
    ) -> Vec<Arc<MarketOrder>> {
        let mut orders: Vec<Arc<MarketOrder>> = self
            .lock()
            .agents()
            .orders_of(agent)
            .filter(|o| o.currency() == currency && C::of(o) == Some(classification))
            .cloned()
            .collect();
        orders.sort_by_key(|o| o.sort_key());
        orders
    }

    pub fn contains(&self, order: &MarketOrder) -> bool {
        self.lock().contains(order.id())
    }

    /// Number of live orders
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> BookStats {
        self.lock().stats()
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::with_defaults()
    }
}
