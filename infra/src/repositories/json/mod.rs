//! JSON file implementations of the repository traits

pub mod checkout_repository_impl;
pub mod order_repository_impl;
pub mod payment_repository_impl;
pub mod session_repository_impl;
pub mod user_repository_impl;

pub use checkout_repository_impl::JsonCheckoutRepository;
pub use order_repository_impl::JsonOrderRepository;
pub use payment_repository_impl::JsonPaymentRepository;
pub use session_repository_impl::JsonSessionRepository;
pub use user_repository_impl::JsonUserRepository;
