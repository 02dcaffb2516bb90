//! # Order Processing Core
//!
//! Domain layer of the order processing backend: entities, error types,
//! repository interfaces with in-memory implementations, and the
//! authentication, order, checkout and payment services built on them.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Checkout, Order, OrderItem, OrderStatus, Payment, PaymentMethod, PaymentStatus, Session,
    SessionMeta, User, UserProfile, UserRole,
};
pub use errors::{
    AuthError, DomainError, DomainResult, OrderError, PaymentError, TokenError, ValidationError,
};
