use thiserror::Error;

use crate::actor_framework::FrameworkError;

use crate::domain::OrderStatus;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    NotFound(String),
    #[error("Invalid product: {0}")]
    InvalidProduct(String),
    #[error("Invalid user: {0}")]
    InvalidUser(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Invalid order status: {0:?}")]
    InvalidStatus(String),
    #[error("Status change from {from} to {to} is not allowed")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Not allowed to read order {0}")]
    Forbidden(String),
    #[error("Order database error: {0}")]
    DatabaseError(String),
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::Rejected(msg) => OrderError::DatabaseError(msg),
            other => OrderError::DatabaseError(other.to_string()),
        }
    }
}
