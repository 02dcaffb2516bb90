//! Token service module for JWT management
//!
//! - JWT access token generation and verification
//! - Session-backed refresh tokens with rotation
//! - Session revocation and background cleanup of expired sessions

mod claims;
mod cleanup;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use claims::{Claims, TokenPair};
pub use cleanup::{CleanupResult, SessionCleanupConfig, SessionCleanupService};
pub use config::TokenServiceConfig;
pub use service::{generate_opaque_token, hash_token, TokenService};
