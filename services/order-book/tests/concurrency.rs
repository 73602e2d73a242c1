//! Concurrency tests for the order book
//!
//! Many agent threads place and cancel orders against one shared book while
//! a clearing thread consumes the cheapest offers through snapshots. At the
//! end the agent index and the classified indices must agree exactly.

use std::sync::{Arc, Barrier};
use std::thread;

use order_book::OrderBook;
use types::ids::AgentId;
use types::ids::OrderId;
use types::market::{Classification, Currency, GoodType, PropertyClass};
use types::order::MarketOrder;

const EUR: Currency = Currency::Euro;
const THREADS: usize = 8;
const ORDERS_PER_THREAD: usize = 200;

fn in_own_axis_index(book: &OrderBook, order: &MarketOrder) -> bool {
    let listed = match order.classification() {
        Some(Classification::GoodType(good_type)) => book.iter_snapshot(order.currency(), good_type),
        Some(Classification::Currency(currency)) => book.iter_snapshot(order.currency(), currency),
        Some(Classification::Property(class)) => book.iter_snapshot(order.currency(), class),
        None => return true,
    };
    listed
        .iter()
        .any(|o| o.id() == order.id() && o.sort_key() == order.sort_key())
}

fn assert_consistent(book: &OrderBook, agents: &[AgentId]) {
    let stats = book.stats();
    let indexed = stats.good_type_orders
        + stats.currency_orders
        + stats.property_orders
        + stats.unclassified_orders;
    assert_eq!(indexed, stats.live_orders);

    let per_agent: usize = agents.iter().map(|a| book.orders_of(*a).len()).sum();
    assert_eq!(per_agent, stats.live_orders);

    let unclassified = agents
        .iter()
        .flat_map(|a| book.orders_of(*a))
        .filter(|o| o.classification().is_none())
        .count();
    assert_eq!(unclassified, stats.unclassified_orders);

    for agent in agents {
        for order in book.orders_of(*agent) {
            assert!(in_own_axis_index(book, &order), "order {} missing from its index", order.id());
        }
    }

    for good_type in GoodType::ALL {
        let snapshot = book.iter_snapshot(EUR, good_type);
        assert!(snapshot.windows(2).all(|w| w[0].sort_key() < w[1].sort_key()));
        for order in &snapshot {
            assert!(book.contains(order));
        }
    }
}

#[test]
fn test_parallel_save_and_delete() {
    let book = Arc::new(OrderBook::with_defaults());
    let agents: Vec<AgentId> = (0..THREADS).map(|_| AgentId::new()).collect();
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = agents
        .iter()
        .enumerate()
        .map(|(t, agent)| {
            let book = Arc::clone(&book);
            let barrier = Arc::clone(&barrier);
            let agent = *agent;
            thread::spawn(move || {
                barrier.wait();
                let mut mine = Vec::new();
                for i in 0..ORDERS_PER_THREAD {
                    let good_type = GoodType::ALL[(t + i) % GoodType::ALL.len()];
                    let price = 1.0 + ((t * 31 + i * 7) % 100) as f64 / 10.0;
                    mine.push(
                        book.save(MarketOrder::for_good(agent, EUR, good_type, price, 1.0))
                            .unwrap(),
                    );
                    // cancel every third order again
                    if i % 3 == 0 {
                        let victim = mine.remove(0);
                        assert!(book.delete(&victim));
                    }
                }
                mine.len()
            })
        })
        .collect();

    let expected: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    assert_eq!(book.len(), expected);
    assert_consistent(&book, &agents);
}

#[test]
fn test_clearing_races_with_agent_teardown() {
    let book = Arc::new(OrderBook::with_defaults());
    let agents: Vec<AgentId> = (0..THREADS).map(|_| AgentId::new()).collect();

    for (t, agent) in agents.iter().enumerate() {
        for i in 0..ORDERS_PER_THREAD {
            let price = 1.0 + ((t + i) % 17) as f64;
            book.save(MarketOrder::for_good(*agent, EUR, GoodType::Wheat, price, 2.0))
                .unwrap();
        }
    }

    let snapshot = book.iter_snapshot(EUR, GoodType::Wheat);
    let before: Vec<OrderId> = snapshot.iter().map(|o| o.id()).collect();
    let teardowns = agents.iter().step_by(2).count();
    let start = Barrier::new(teardowns + 1);

    let seen = thread::scope(|scope| {
        // clearing pass over a snapshot taken before teardown starts
        let clearing = scope.spawn(|| {
            start.wait();
            let mut seen = Vec::new();
            for order in snapshot {
                assert_eq!(order.amount(), 2.0);
                seen.push(order.id());
                // may already be gone via teardown; delete is idempotent
                book.delete(&order);
            }
            seen
        });
        // teardown of half the agents at the same time
        for agent in agents.iter().step_by(2) {
            let book = &book;
            let start = &start;
            scope.spawn(move || {
                start.wait();
                book.delete_all_orders(*agent);
            });
        }
        // readers
        scope.spawn(|| {
            for _ in 0..100 {
                let price = book.find_marginal_price(EUR, GoodType::Wheat);
                assert!(price.is_nan() || price >= 1.0);
                let _ = book.sum_amount(EUR, GoodType::Wheat);
            }
        });
        clearing.join().unwrap()
    });

    assert_eq!(seen, before);
    assert_eq!(seen.len(), THREADS * ORDERS_PER_THREAD);
    assert!(book.is_empty());
    assert!(book.find_marginal_price(EUR, GoodType::Wheat).is_nan());
    assert_consistent(&book, &agents);
}

#[test]
fn test_mixed_axes_under_contention() {
    let book = Arc::new(OrderBook::with_defaults());
    let agents: Vec<AgentId> = (0..THREADS).map(|_| AgentId::new()).collect();

    thread::scope(|scope| {
        for (t, agent) in agents.iter().enumerate() {
            let book = &book;
            let agent = *agent;
            scope.spawn(move || {
                for i in 0..50 {
                    let price = 1.0 + (i % 10) as f64;
                    let order = match (t + i) % 4 {
                        0 => MarketOrder::for_good(agent, EUR, GoodType::Steel, price, 1.0),
                        1 => MarketOrder::for_currency(agent, EUR, Currency::Yen, price, 1.0),
                        2 => MarketOrder::for_property(agent, EUR, PropertyClass::Share, price, 1.0),
                        _ => MarketOrder::new(agent, EUR, None, price, 1.0),
                    };
                    let order = book.save(order).unwrap();
                    if i % 5 == 0 {
                        book.reprice(&order, price + 0.5).unwrap();
                    }
                }
                book.delete_all_orders_for(agent, EUR, Currency::Yen);
            });
        }
    });

    // a quarter of the 400 orders were yen offers, all purged
    assert_eq!(book.order_count(EUR, Currency::Yen), 0);
    assert_eq!(book.len(), THREADS * 50 - 100);
    assert_consistent(&book, &agents);
}
