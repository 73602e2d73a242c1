//! Market Order Book
//!
//! In-memory store of open market orders for the economic simulation,
//! indexed along three classification axes (good type, counter-currency,
//! property class) plus a per-agent index.
//!
//! **Key Invariants:**
//! - Inside every index, orders are sorted by ascending price, ties by
//!   ascending order id; the front order sets the marginal price
//! - A live order sits in exactly the index implied by its classification
//!   and in its offeror's agent index
//! - `save` and `delete` are atomic with respect to every index
//!
//! The book stores and serves orders; pairing and executing them is left to
//! the clearing logic that queries it.

pub mod book;
pub mod config;
pub mod order_book;

pub use book::{BookStats, ClassificationAxis};
pub use config::{OrderBookConfig, ResavePolicy};
pub use order_book::{Fill, LiveOrders, OrderBook};
