//! Repository implementations backed by the JSON store

pub mod json;

#[cfg(test)]
mod tests;

pub use json::{
    JsonCheckoutRepository, JsonOrderRepository, JsonPaymentRepository, JsonSessionRepository,
    JsonUserRepository,
};
