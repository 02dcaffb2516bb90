//! Error types for authentication, tokens, validation, orders and payments
//!
//! Display strings are the client-facing messages; the presentation layer
//! only chooses status codes.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is locked. Try again later")]
    AccountLocked,

    #[error("Not authorized, no token")]
    Unauthorized,

    #[error("Not authorized to access this resource")]
    Forbidden,

    #[error("Invalid verification token")]
    InvalidVerificationToken,

    #[error("Invalid or expired reset token")]
    InvalidResetToken,

    #[error("Current password is incorrect")]
    IncorrectCurrentPassword,

    #[error("User not found")]
    UserNotFound,

    #[error("Session has expired or been revoked")]
    SessionExpired,

    #[error("Email could not be sent")]
    EmailDeliveryFailed,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Not authorized, token failed")]
    InvalidToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFields { fields: Vec<String> },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Password does not meet requirements: {reason}")]
    WeakPassword { reason: String },

    #[error("{message}")]
    InvalidInput { field: String, message: String },
}

impl ValidationError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Order lifecycle errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    #[error("Invalid status: {value}")]
    InvalidStatus { value: String },

    #[error("Cannot change status of order from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Cannot delete order in {status} status")]
    NotDeletable { status: String },
}

/// Payment errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaymentError {
    #[error("Invalid payment method: {value}")]
    InvalidMethod { value: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Payment has already been refunded")]
    AlreadyRefunded,
}
