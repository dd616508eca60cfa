use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during user operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("User database error: {0}")]
    DatabaseError(String),
}

impl From<FrameworkError> for UserError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            FrameworkError::Rejected(msg) => UserError::ValidationError(msg),
            other => UserError::DatabaseError(other.to_string()),
        }
    }
}
