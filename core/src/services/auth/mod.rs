//! Authentication service module
//!
//! - Registration with email verification
//! - Password login with account lockout
//! - Password reset by emailed token
//! - Token refresh and logout

mod config;
mod input;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use input::{NewAccount, RegisterInput};
pub use password::{hash_password, verify_password};
pub use service::{AuthResult, AuthService};
