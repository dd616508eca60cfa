use thiserror::Error;

use crate::actor_framework::FrameworkError;

use crate::storage::StorageError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: u32 },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Product image upload failed: {0}")]
    Storage(#[from] StorageError),
    #[error("Product database error: {0}")]
    DatabaseError(String),
}

impl From<FrameworkError> for ProductError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            FrameworkError::Rejected(msg) => ProductError::ValidationError(msg),
            other => ProductError::DatabaseError(other.to_string()),
        }
    }
}
