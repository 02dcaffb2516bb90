//! Business services containing domain logic and use cases.

pub mod auth;
pub mod checkout;
pub mod email;
pub mod orders;
pub mod payments;
pub mod rate_limit;
pub mod token;
pub mod user;

// Re-export commonly used types
pub use auth::{AuthResult, AuthService, AuthServiceConfig, RegisterInput};
pub use checkout::CheckoutService;
pub use email::{EmailError, EmailMessage, EmailSender};
pub use orders::{NewOrder, OrderFilter, OrderService};
pub use payments::PaymentService;
pub use rate_limit::{RateLimitDecision, RateLimitPolicy, RateLimitStore};
pub use token::{
    Claims, SessionCleanupConfig, SessionCleanupService, TokenPair, TokenService,
    TokenServiceConfig,
};
pub use user::{UpdateProfile, UserService};
