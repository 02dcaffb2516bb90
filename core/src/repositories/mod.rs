//! Repository interfaces and their in-memory implementations.

pub mod checkout;
pub mod order;
pub mod payment;
pub mod session;
pub mod user;

pub use checkout::{CheckoutRepository, InMemoryCheckoutRepository};
pub use order::{InMemoryOrderRepository, OrderRepository};
pub use payment::{InMemoryPaymentRepository, PaymentRepository};
pub use session::{InMemorySessionRepository, SessionRepository};
pub use user::{InMemoryUserRepository, UserRepository};

use crate::errors::DomainError;

/// Check-and-change applied to one stored record while the repository holds it
///
/// Nothing is written when the closure fails.
pub type Mutation<T> = Box<dyn FnOnce(&mut T) -> Result<(), DomainError> + Send>;

/// Precondition checked against a stored record while the repository holds it
pub type Guard<T> = Box<dyn FnOnce(&T) -> Result<(), DomainError> + Send>;

/// Run `change` on a copy of `slot` and keep the copy only on success
pub fn apply_mutation<T: Clone>(slot: &mut T, change: Mutation<T>) -> Result<T, DomainError> {
    let mut draft = slot.clone();
    change(&mut draft)?;
    *slot = draft.clone();
    Ok(draft)
}
