//! Market order record
//!
//! A [`MarketOrder`] is an open offer by one agent to sell `amount` units of
//! something at `price_per_unit`, quoted in a primary currency. The record is
//! immutable once built; changing price or amount produces a new record with
//! the same id (see [`MarketOrder::with_price`]).

use std::cmp::Ordering;

use crate::errors::OrderError;
use crate::ids::{AgentId, OrderId};
use crate::market::{Classification, Currency, GoodType, PropertyClass};
use serde::{Deserialize, Serialize};

/// Sort key of an order inside an index: price ascending, then id ascending
///
/// Two distinct orders never compare equal, so a sorted set never drops an
/// order that happens to share a price with another.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderKey {
    pub price: f64,
    pub id: OrderId,
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price
            .total_cmp(&other.price)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}

/// Open offer on a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOrder {
    id: OrderId,
    offeror: AgentId,
    currency: Currency,
    classification: Option<Classification>,
    price_per_unit: f64,
    amount: f64,
}

impl MarketOrder {
    /// Create a new order with a freshly allocated id
    pub fn new(
        offeror: AgentId,
        currency: Currency,
        classification: Option<Classification>,
        price_per_unit: f64,
        amount: f64,
    ) -> Self {
        Self {
            id: OrderId::new(),
            offeror,
            currency,
            classification,
            price_per_unit,
            amount,
        }
    }

    /// Offer of a good, e.g. wheat priced in euro
    pub fn for_good(
        offeror: AgentId,
        currency: Currency,
        good_type: GoodType,
        price_per_unit: f64,
        amount: f64,
    ) -> Self {
        Self::new(offeror, currency, Some(good_type.into()), price_per_unit, amount)
    }

    /// Offer of a foreign currency priced in `currency`
    pub fn for_currency(
        offeror: AgentId,
        currency: Currency,
        commodity_currency: Currency,
        price_per_unit: f64,
        amount: f64,
    ) -> Self {
        Self::new(
            offeror,
            currency,
            Some(commodity_currency.into()),
            price_per_unit,
            amount,
        )
    }

    /// Offer of a piece of property (share, bond)
    pub fn for_property(
        offeror: AgentId,
        currency: Currency,
        property_class: PropertyClass,
        price_per_unit: f64,
        amount: f64,
    ) -> Self {
        Self::new(
            offeror,
            currency,
            Some(property_class.into()),
            price_per_unit,
            amount,
        )
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn offeror(&self) -> AgentId {
        self.offeror
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    pub fn price_per_unit(&self) -> f64 {
        self.price_per_unit
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn good_type(&self) -> Option<GoodType> {
        match self.classification {
            Some(Classification::GoodType(g)) => Some(g),
            _ => None,
        }
    }

    pub fn commodity_currency(&self) -> Option<Currency> {
        match self.classification {
            Some(Classification::Currency(c)) => Some(c),
            _ => None,
        }
    }

    pub fn property_class(&self) -> Option<PropertyClass> {
        match self.classification {
            Some(Classification::Property(p)) => Some(p),
            _ => None,
        }
    }

    pub fn sort_key(&self) -> OrderKey {
        OrderKey {
            price: self.price_per_unit,
            id: self.id,
        }
    }

    pub fn total_value(&self) -> f64 {
        self.price_per_unit * self.amount
    }

    /// Check the order can be placed: positive finite price, non-negative
    /// finite amount
    pub fn validate(&self) -> Result<(), OrderError> {
        if !self.price_per_unit.is_finite() || self.price_per_unit <= 0.0 {
            return Err(OrderError::InvalidPrice(format!(
                "price per unit {} of order {} is not a positive finite number",
                self.price_per_unit, self.id
            )));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(OrderError::InvalidAmount(format!(
                "amount {} of order {} is not a non-negative finite number",
                self.amount, self.id
            )));
        }
        Ok(())
    }

    /// Same order (same id) at a different price
    pub fn with_price(&self, price_per_unit: f64) -> Self {
        Self {
            price_per_unit,
            ..self.clone()
        }
    }

    /// Same order (same id) with a different remaining amount
    pub fn with_amount(&self, amount: f64) -> Self {
        Self {
            amount,
            ..self.clone()
        }
    }
}
