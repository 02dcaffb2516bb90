//! Domain entities representing core business objects.

pub mod checkout;
pub mod order;
pub mod payment;
pub mod session;
pub mod user;

pub use checkout::Checkout;
pub use order::{
    round_currency, shipping_for, tax_for, Address, Order, OrderItem, OrderStatus, OrderTotals,
    BASE_SHIPPING, SHIPPING_PER_ITEM, TAX_RATE,
};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use session::{Session, SessionMeta};
pub use user::{User, UserProfile, UserRole};
