//! Outgoing email abstraction and the account email templates

mod templates;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use templates::{password_reset_email, verification_email};

/// A rendered email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Email delivery failed: {0}")]
pub struct EmailError(pub String);

/// Delivery channel for account emails
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a message, returning a provider message id
    async fn send(&self, message: EmailMessage) -> Result<String, EmailError>;
}
