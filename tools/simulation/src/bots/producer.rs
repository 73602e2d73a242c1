//! Producer bot
//!
//! Sells one good. Every tick it marks down whatever it still has on offer
//! and posts its new output at a seeded random price around the reference.

use order_book::OrderBook;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use types::errors::OrderError;
use types::ids::AgentId;
use types::market::GoodType;
use types::order::MarketOrder;

use crate::config::SimulationConfig;

/// What a producer did during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProducerActivity {
    pub offers_placed: u64,
    pub offers_repriced: u64,
}

/// Factory offering a single good with deterministic seeded RNG.
pub struct Producer {
    pub agent_id: AgentId,
    pub good: GoodType,
    pub offers_placed: u64,
    rng: ChaCha8Rng,
}

impl Producer {
    pub fn new(agent_id: AgentId, good: GoodType, seed: u64) -> Self {
        Self {
            agent_id,
            good,
            offers_placed: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Asking price for this tick's output
    pub fn quote(&mut self, config: &SimulationConfig) -> f64 {
        let spread = config.price_spread;
        let jitter: f64 = if spread > 0.0 {
            self.rng.gen_range(-spread..spread)
        } else {
            0.0
        };
        config.reference_price * (1.0 + jitter)
    }

    /// Mark down leftover offers, then offer this tick's output
    pub fn act(&mut self, book: &OrderBook, config: &SimulationConfig) -> Result<ProducerActivity, OrderError> {
        let mut activity = ProducerActivity::default();

        for offer in book.find_orders(self.agent_id, config.currency, self.good) {
            let marked_down = offer.price_per_unit() * (1.0 - config.markdown);
            match book.reprice(&offer, marked_down) {
                Ok(_) => activity.offers_repriced += 1,
                // sold out between the lookup and the reprice
                Err(OrderError::NotLive { .. }) => {}
                Err(err) => return Err(err),
            }
        }

        if config.output_per_tick > 0.0 {
            let price = self.quote(config);
            book.save(MarketOrder::for_good(
                self.agent_id,
                config.currency,
                self.good,
                price,
                config.output_per_tick,
            ))?;
            activity.offers_placed += 1;
            self.offers_placed += 1;
        }

        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_within_spread() {
        let config = SimulationConfig::default();
        let mut producer = Producer::new(AgentId::new(), GoodType::Wheat, 7);

        for _ in 0..100 {
            let price = producer.quote(&config);
            assert!(price >= config.reference_price * (1.0 - config.price_spread));
            assert!(price < config.reference_price * (1.0 + config.price_spread));
        }
    }

    #[test]
    fn test_quote_is_seeded() {
        let config = SimulationConfig::default();
        let mut a = Producer::new(AgentId::new(), GoodType::Wheat, 99);
        let mut b = Producer::new(AgentId::new(), GoodType::Wheat, 99);

        for _ in 0..10 {
            assert_eq!(a.quote(&config), b.quote(&config));
        }
    }

    #[test]
    fn test_act_marks_down_leftovers() {
        let config = SimulationConfig {
            price_spread: 0.0,
            ..SimulationConfig::default()
        };
        let book = OrderBook::with_defaults();
        let mut producer = Producer::new(AgentId::new(), GoodType::Wheat, 1);

        let first = producer.act(&book, &config).unwrap();
        assert_eq!(first.offers_placed, 1);
        assert_eq!(first.offers_repriced, 0);

        let second = producer.act(&book, &config).unwrap();
        assert_eq!(second.offers_repriced, 1);

        let prices: Vec<f64> = book
            .find_orders(producer.agent_id, config.currency, GoodType::Wheat)
            .iter()
            .map(|o| o.price_per_unit())
            .collect();
        assert_eq!(prices, vec![config.reference_price * (1.0 - config.markdown), config.reference_price]);
        assert_eq!(producer.offers_placed, 2);
    }
}
