//! Error types for order handling
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

use crate::ids::OrderId;

/// Order-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Order already live in the book: {order_id}")]
    AlreadyLive { order_id: OrderId },

    #[error("Order not live in the book: {order_id}")]
    NotLive { order_id: OrderId },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_display() {
        let err = OrderError::InvalidPrice("-1 is not positive".to_string());
        assert_eq!(err.to_string(), "Invalid price: -1 is not positive");
    }

    #[test]
    fn test_already_live_display() {
        let err = OrderError::AlreadyLive {
            order_id: OrderId::from_raw(12),
        };
        assert_eq!(err.to_string(), "Order already live in the book: 12");
    }
}
