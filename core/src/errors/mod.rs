//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, OrderError, PaymentError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("Too many requests, please try again later")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),

    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Payment(#[from] PaymentError),
}

impl DomainError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Shorthand for a single-field validation failure
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        DomainError::ValidationErr(ValidationError::invalid(field, message))
    }

    /// Whether the error is the server's fault rather than the caller's
    pub fn is_internal(&self) -> bool {
        matches!(self, DomainError::Storage { .. } | DomainError::Internal { .. })
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
#[path = "tests/domain_error_tests.rs"]
mod tests;
