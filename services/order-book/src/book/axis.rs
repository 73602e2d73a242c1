//! Classification axes
//!
//! Orders are indexed along three independent axes. Each axis value type
//! implements [`ClassificationAxis`], which lets every query on the book be
//! written once and called as
//! `book.find_marginal_price(Currency::Euro, GoodType::Wheat)`,
//! `book.find_marginal_price(Currency::Euro, Currency::Yen)` or
//! `book.find_marginal_price(Currency::Euro, PropertyClass::Share)`.

use std::fmt;
use std::hash::Hash;

use types::market::{Classification, Currency, GoodType, PropertyClass};
use types::order::MarketOrder;

/// A value type that orders can be classified by
pub trait ClassificationAxis:
    sealed::Sealed + Copy + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Axis name used in log fields
    const AXIS: &'static str;

    /// The order's value on this axis, if it is classified along it
    fn of(order: &MarketOrder) -> Option<Self>;
}

pub(crate) mod sealed {
    use super::super::{BookState, ClassifiedIndex};

    /// Maps an axis to the index that stores it inside [`BookState`]
    pub trait Sealed: Sized {
        fn index(state: &BookState) -> &ClassifiedIndex<Self>;
        fn index_mut(state: &mut BookState) -> &mut ClassifiedIndex<Self>;
    }
}

impl ClassificationAxis for GoodType {
    const AXIS: &'static str = "good_type";

    fn of(order: &MarketOrder) -> Option<Self> {
        match order.classification() {
            Some(Classification::GoodType(good_type)) => Some(good_type),
            _ => None,
        }
    }
}

impl ClassificationAxis for Currency {
    const AXIS: &'static str = "commodity_currency";

    fn of(order: &MarketOrder) -> Option<Self> {
        match order.classification() {
            Some(Classification::Currency(currency)) => Some(currency),
            _ => None,
        }
    }
}

impl ClassificationAxis for PropertyClass {
    const AXIS: &'static str = "property_class";

    fn of(order: &MarketOrder) -> Option<Self> {
        match order.classification() {
            Some(Classification::Property(property_class)) => Some(property_class),
            _ => None,
        }
    }
}
