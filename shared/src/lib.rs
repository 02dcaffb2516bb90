//! Shared utilities and common types for the order processing backend
//!
//! - Configuration types
//! - Response envelopes and pagination
//! - Validation helpers (email, password strength, address fields)

pub mod config;
pub mod types;
pub mod utils;

pub use config::{
    AppConfig, AuthConfig, ConfigError, CorsConfig, EmailConfig, EndpointLimit, Environment,
    JwtConfig, LogFormat, LoggingConfig, RateLimitConfig, ServerConfig, StorageBackend,
    StorageConfig,
};
pub use types::{ApiErrorBody, ApiResponse, PageInfo, Paginated, Pagination};
pub use utils::validation;
