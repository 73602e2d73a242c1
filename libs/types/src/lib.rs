//! Types library for the economic simulation markets
//!
//! Core type definitions shared by the order book and the agents that trade
//! through it.
//!
//! # Modules
//! - `ids`: Unique identifiers (OrderId, AgentId)
//! - `market`: Currencies, goods, property classes and the order classification
//! - `order`: The market order record and its sort key
//! - `errors`: Error taxonomy

pub mod ids;
pub mod market;
pub mod order;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::market::*;
    pub use crate::order::*;
    pub use crate::errors::*;
}
