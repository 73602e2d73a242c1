//! Agent bots driving the market

pub mod producer;
pub mod household;

pub use producer::{Producer, ProducerActivity};
pub use household::{Household, Purchase};
