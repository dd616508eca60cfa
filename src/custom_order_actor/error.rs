use thiserror::Error;

use crate::actor_framework::FrameworkError;

use crate::domain::OrderStatus;
use crate::pricing::PricingError;
use crate::storage::StorageError;

/// Errors that can occur during custom order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CustomOrderError {
    #[error("Custom order not found: {0}")]
    NotFound(String),
    #[error("Cake selection cannot be priced: {0}")]
    Pricing(#[from] PricingError),
    #[error("Quoted price {quoted} does not match computed price {computed}")]
    PriceMismatch { quoted: i64, computed: i64 },
    #[error("Invalid order status: {0:?}")]
    InvalidStatus(String),
    #[error("Status change from {from} to {to} is not allowed")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Not allowed to read custom order {0}")]
    Forbidden(String),
    #[error("Reference image upload failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Custom order database error: {0}")]
    DatabaseError(String),
}

impl From<FrameworkError> for CustomOrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => CustomOrderError::NotFound(id),
            FrameworkError::Rejected(msg) => CustomOrderError::DatabaseError(msg),
            other => CustomOrderError::DatabaseError(other.to_string()),
        }
    }
}
