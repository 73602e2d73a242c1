//! Tick loop over a shared order book
//!
//! Each tick runs three phases:
//! 1. producers act in parallel, spread over `worker_threads` threads
//! 2. goods clear in parallel, households for one good shop in turn
//! 3. producers may leave the market; their orders are purged and a
//!    newcomer takes the slot

use std::panic;
use std::sync::Arc;
use std::thread;

use order_book::OrderBook;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};
use types::errors::OrderError;
use types::ids::AgentId;

use crate::bots::{Household, Producer, ProducerActivity, Purchase};
use crate::config::SimulationConfig;
use crate::metrics::{GoodQuote, SimMetrics, TickReport};
use crate::SimulationError;

pub struct MarketSim {
    config: SimulationConfig,
    book: Arc<OrderBook>,
    producers: Vec<Producer>,
    households: Vec<Household>,
    rng: ChaCha8Rng,
    tick: u64,
    metrics: SimMetrics,
}

impl MarketSim {
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        config.validate()?;

        let book = Arc::new(OrderBook::new(config.book.clone()));
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let mut producers = Vec::with_capacity(config.goods.len() * config.producers_per_good);
        for &good in &config.goods {
            for _ in 0..config.producers_per_good {
                producers.push(Producer::new(AgentId::new(), good, rng.gen()));
            }
        }

        let households = (0..config.households)
            .map(|_| Household::new(AgentId::new()))
            .collect();

        info!(
            producers = producers.len(),
            households = config.households,
            goods = config.goods.len(),
            seed = config.seed,
            "Market simulation initialised"
        );

        Ok(Self {
            config,
            book,
            producers,
            households,
            rng,
            tick: 0,
            metrics: SimMetrics::new(),
        })
    }

    pub fn book(&self) -> &Arc<OrderBook> {
        &self.book
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SimMetrics {
        &self.metrics
    }

    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    /// Run the configured number of ticks and hand back the metrics
    pub fn run(mut self) -> Result<SimMetrics, SimulationError> {
        for _ in 0..self.config.ticks {
            self.step()?;
        }
        info!("{}", self.metrics.summary());
        Ok(self.metrics)
    }

    /// Advance the market by one tick
    pub fn step(&mut self) -> Result<TickReport, SimulationError> {
        self.tick += 1;

        for activity in self.produce()? {
            self.metrics.record_production(&activity);
        }
        for purchase in self.clear()? {
            self.metrics.record_purchase(&purchase);
        }
        self.turn_over_producers();

        let report = self.report();
        info!(
            tick = report.tick,
            live_orders = report.live_orders,
            fills = self.metrics.fills,
            "Tick complete"
        );
        self.metrics.ticks_run = self.tick;
        self.metrics.reports.push(report.clone());
        Ok(report)
    }

    fn produce(&mut self) -> Result<Vec<ProducerActivity>, OrderError> {
        let chunk_size = self.producers.len().div_ceil(self.config.worker_threads).max(1);
        let book = self.book.as_ref();
        let config = &self.config;

        thread::scope(|scope| {
            let handles: Vec<_> = self
                .producers
                .chunks_mut(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter_mut()
                            .map(|producer| producer.act(book, config))
                            .collect::<Result<Vec<_>, _>>()
                    })
                })
                .collect();

            let mut activities = Vec::new();
            for handle in handles {
                match handle.join() {
                    Ok(result) => activities.extend(result?),
                    Err(payload) => panic::resume_unwind(payload),
                }
            }
            Ok(activities)
        })
    }

    fn clear(&self) -> Result<Vec<Purchase>, OrderError> {
        let budget = self.config.household_budget / self.config.goods.len() as f64;
        let currency = self.config.currency;
        let book = self.book.as_ref();
        let households = &self.households;

        thread::scope(|scope| {
            let handles: Vec<_> = self
                .config
                .goods
                .iter()
                .map(|&good| {
                    scope.spawn(move || {
                        households
                            .iter()
                            .map(|household| household.shop(book, currency, good, budget))
                            .collect::<Result<Vec<_>, _>>()
                    })
                })
                .collect();

            let mut purchases = Vec::new();
            for handle in handles {
                match handle.join() {
                    Ok(result) => purchases.extend(result?),
                    Err(payload) => panic::resume_unwind(payload),
                }
            }
            Ok(purchases)
        })
    }

    fn turn_over_producers(&mut self) {
        if self.config.exit_probability <= 0.0 {
            return;
        }

        for slot in 0..self.producers.len() {
            if !self.rng.gen_bool(self.config.exit_probability) {
                continue;
            }
            let leaving = &self.producers[slot];
            let purged = self.book.delete_all_orders(leaving.agent_id);
            debug!(
                tick = self.tick,
                agent = %leaving.agent_id,
                good = ?leaving.good,
                purged,
                "Producer left the market"
            );
            self.metrics.record_exit(purged);

            let good = leaving.good;
            self.producers[slot] = Producer::new(AgentId::new(), good, self.rng.gen());
        }
    }

    fn report(&self) -> TickReport {
        let currency = self.config.currency;
        let quotes = self
            .config
            .goods
            .iter()
            .map(|&good| {
                let price = self.book.find_marginal_price(currency, good);
                GoodQuote {
                    good,
                    marginal_price: (!price.is_nan()).then_some(price),
                    open_offers: self.book.order_count(currency, good),
                    offered_amount: self.book.sum_amount(currency, good),
                }
            })
            .collect();

        TickReport {
            tick: self.tick,
            live_orders: self.book.len(),
            quotes,
        }
    }
}
