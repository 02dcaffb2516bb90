//! Request and response bodies

pub mod auth;
pub mod orders;

use op_core::errors::DomainError;
use validator::ValidationErrors;

/// First field failure of a `validator` run as a domain validation error
pub fn validation_error(errors: &ValidationErrors) -> DomainError {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    match fields.into_iter().next() {
        Some((field, failures)) => {
            let message = failures
                .first()
                .and_then(|failure| failure.message.as_ref())
                .map(|message| message.to_string())
                .unwrap_or_else(|| format!("Invalid value for {}", field));
            DomainError::invalid(field.to_string(), message)
        }
        None => DomainError::invalid("body", "Invalid request data"),
    }
}
