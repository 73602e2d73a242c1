//! Household bot
//!
//! Spends a fixed budget on a good, taking the cheapest offers first.
//! Offers are read from a snapshot; each purchase is taken from the order as
//! it stands in the book, so offers another buyer emptied or cut in the
//! meantime are charged for what was actually left.

use order_book::OrderBook;
use types::errors::OrderError;
use types::ids::AgentId;
use types::market::{Currency, GoodType};

/// Result of one shopping trip
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Purchase {
    pub units: f64,
    pub spent: f64,
    pub fills: u64,
    pub partial_fills: u64,
}

pub struct Household {
    pub agent_id: AgentId,
}

impl Household {
    pub fn new(agent_id: AgentId) -> Self {
        Self { agent_id }
    }

    /// Buy `good` for at most `budget`, cheapest offers first
    ///
    /// Offers bought outright leave the book; the last offer may be bought
    /// in part, which lowers its remaining amount.
    pub fn shop(
        &self,
        book: &OrderBook,
        currency: Currency,
        good: GoodType,
        budget: f64,
    ) -> Result<Purchase, OrderError> {
        let mut purchase = Purchase::default();
        let mut remaining = budget;

        for offer in book.iter_snapshot(currency, good) {
            if remaining <= 0.0 {
                break;
            }
            if offer.offeror() == self.agent_id {
                continue;
            }

            let wanted = remaining / offer.price_per_unit();
            let Some(fill) = book.take(&offer, wanted)? else {
                continue;
            };
            if fill.amount <= 0.0 {
                continue;
            }

            let spent = fill.value().min(remaining);
            remaining -= spent;
            purchase.units += fill.amount;
            purchase.spent += spent;
            if fill.exhausted {
                purchase.fills += 1;
            } else {
                purchase.partial_fills += 1;
                remaining = 0.0;
            }
        }

        Ok(purchase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::order::MarketOrder;

    const EUR: Currency = Currency::Euro;

    #[test]
    fn test_shop_takes_cheapest_first() {
        let book = OrderBook::with_defaults();
        let seller = AgentId::new();
        book.save(MarketOrder::for_good(seller, EUR, GoodType::Wheat, 2.0, 5.0)).unwrap();
        book.save(MarketOrder::for_good(seller, EUR, GoodType::Wheat, 1.0, 5.0)).unwrap();

        let household = Household::new(AgentId::new());
        let purchase = household.shop(&book, EUR, GoodType::Wheat, 5.0).unwrap();

        assert_eq!(purchase.fills, 1);
        assert_eq!(purchase.units, 5.0);
        assert_eq!(purchase.spent, 5.0);
        assert_eq!(book.find_marginal_price(EUR, GoodType::Wheat), 2.0);
    }

    #[test]
    fn test_shop_partial_fill_reduces_amount() {
        let book = OrderBook::with_defaults();
        let seller = AgentId::new();
        book.save(MarketOrder::for_good(seller, EUR, GoodType::Wheat, 2.0, 10.0)).unwrap();

        let household = Household::new(AgentId::new());
        let purchase = household.shop(&book, EUR, GoodType::Wheat, 8.0).unwrap();

        assert_eq!(purchase.partial_fills, 1);
        assert_eq!(purchase.units, 4.0);
        assert_eq!(book.sum_amount(EUR, GoodType::Wheat), 6.0);
        assert_eq!(book.order_count(EUR, GoodType::Wheat), 1);
    }

    #[test]
    fn test_shop_charges_for_what_is_left() {
        let book = OrderBook::with_defaults();
        let seller = AgentId::new();
        let offer = book.save(MarketOrder::for_good(seller, EUR, GoodType::Wheat, 1.0, 10.0)).unwrap();

        // another buyer takes most of the offer after our snapshot was read
        let stale = book.iter_snapshot(EUR, GoodType::Wheat);
        book.take(&offer, 8.0).unwrap();
        assert_eq!(stale[0].amount(), 10.0);

        let household = Household::new(AgentId::new());
        let purchase = household.shop(&book, EUR, GoodType::Wheat, 100.0).unwrap();

        assert_eq!(purchase.units, 2.0);
        assert_eq!(purchase.spent, 2.0);
        assert_eq!(purchase.fills, 1);
        assert!(book.is_empty());
    }

    #[test]
    fn test_parallel_households_conserve_units() {
        let book = OrderBook::with_defaults();
        let seller = AgentId::new();
        for price in [1.0, 1.5, 2.0, 2.5] {
            book.save(MarketOrder::for_good(seller, EUR, GoodType::Wheat, price, 10.0)).unwrap();
        }

        let bought: f64 = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let book = &book;
                    scope.spawn(move || {
                        let household = Household::new(AgentId::new());
                        (0..5)
                            .map(|_| household.shop(book, EUR, GoodType::Wheat, 3.0).unwrap().units)
                            .sum::<f64>()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).sum()
        });

        let left = book.sum_amount(EUR, GoodType::Wheat);
        assert!((bought + left - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_shop_on_empty_market() {
        let book = OrderBook::with_defaults();
        let household = Household::new(AgentId::new());

        let purchase = household.shop(&book, EUR, GoodType::Clothing, 100.0).unwrap();
        assert_eq!(purchase, Purchase::default());
    }
}
