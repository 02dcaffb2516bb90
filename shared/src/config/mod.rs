//! Configuration module with business-specific sub-modules
//!
//! - `auth` - JWT and account security settings
//! - `email` - sender address and frontend links
//! - `environment` - environment detection and logging configuration
//! - `rate_limit` - request budgets for the HTTP surface
//! - `server` - HTTP server and CORS configuration
//! - `storage` - repository backend and JSON store locking
//!
//! Values are layered: built-in defaults for the detected environment, then
//! an optional TOML file named by `OP_CONFIG_FILE`, then environment
//! variables (a `.env` file is loaded first when present).

pub mod auth;
pub mod email;
pub mod environment;
pub mod rate_limit;
pub mod server;
pub mod storage;

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub use auth::{AuthConfig, JwtConfig};
pub use email::EmailConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use rate_limit::{EndpointLimit, RateLimitConfig};
pub use server::{CorsConfig, ServerConfig};
pub use storage::{StorageBackend, StorageConfig};

/// Errors raised while assembling the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {name}")]
    Missing { name: &'static str },

    #[error("Invalid value '{value}' for {name}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration file: {0}")]
    Source(#[from] ::config::ConfigError),
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub email: EmailConfig,

    /// Redis connection string; counters stay in memory when absent
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Populate empty order and payment collections with generated data
    #[serde(default)]
    pub seed_mock_data: bool,

    /// Number of orders generated when seeding
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl AppConfig {
    /// Built-in defaults for an environment
    pub fn for_environment(environment: Environment) -> Self {
        let mut server = ServerConfig::default();
        if environment.is_production() {
            server.host = String::from("0.0.0.0");
        }

        Self {
            environment,
            server,
            auth: AuthConfig::default(),
            storage: StorageConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::for_environment(environment),
            email: EmailConfig::default(),
            redis_url: None,
            seed_mock_data: false,
            seed_count: default_seed_count(),
        }
    }

    /// In-memory configuration for test harnesses
    pub fn test() -> Self {
        let mut config = Self::for_environment(Environment::Test);
        config.storage.backend = StorageBackend::Memory;
        config.auth.jwt.secret = String::from("test-secret-with-enough-entropy");
        config.auth.bcrypt_cost = 4;
        config
    }

    /// Load configuration from `.env`, an optional TOML file and the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env();
        let mut config = Self::for_environment(environment);

        if let Some(path) = env_var("OP_CONFIG_FILE") {
            config = Self::merge_file(&config, PathBuf::from(path))?;
        }

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn merge_file(base: &Self, path: PathBuf) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .add_source(::config::Config::try_from(base)?)
            .add_source(::config::File::from(path).required(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(host) = env_var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env::<u16>("PORT")?.or(parse_env::<u16>("SERVER_PORT")?) {
            self.server.port = port;
        }
        if let Some(workers) = parse_env::<usize>("SERVER_WORKERS")? {
            self.server.workers = workers;
        }
        if let Some(origins) = env_var("CORS_ORIGINS") {
            self.server.cors.allowed_origins = origins
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
        }

        if let Some(secret) = env_var("JWT_SECRET") {
            self.auth.jwt.secret = secret;
        }
        if let Some(expiry) = duration_env("JWT_EXPIRE")? {
            self.auth.jwt.access_token_expiry = expiry;
        }
        if let Some(expiry) = duration_env("JWT_REFRESH_EXPIRE")? {
            self.auth.jwt.refresh_token_expiry = expiry;
        }
        if let Some(issuer) = env_var("JWT_ISSUER") {
            self.auth.jwt.issuer = issuer;
        }
        if let Some(cost) = parse_env::<u32>("BCRYPT_COST")? {
            self.auth.bcrypt_cost = cost;
        }

        if let Some(backend) = parse_env::<StorageBackend>("STORAGE_BACKEND")? {
            self.storage.backend = backend;
        }
        if let Some(path) = env_var("JSON_STORAGE_PATH") {
            self.storage.data_dir = PathBuf::from(path);
        }
        if let Some(timeout) = parse_env::<u64>("STORAGE_LOCK_TIMEOUT_MS")? {
            self.storage.lock_timeout_ms = timeout;
        }
        if let Some(retries) = parse_env::<u32>("STORAGE_MAX_RETRIES")? {
            self.storage.max_retries = retries;
        }
        if let Some(delay) = parse_env::<u64>("STORAGE_RETRY_DELAY_MS")? {
            self.storage.retry_delay_ms = delay;
        }

        if let Some(minutes) = parse_env::<u64>("RATE_LIMIT_WINDOW")? {
            self.rate_limit.window_seconds = minutes * 60;
        }
        if let Some(max) = parse_env::<u32>("RATE_LIMIT_MAX")? {
            self.rate_limit.max_requests = max;
        }
        if let Some(enabled) = parse_env::<bool>("RATE_LIMIT_ENABLED")? {
            self.rate_limit.enabled = enabled;
        }

        if let Some(level) = env_var("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = parse_env::<LogFormat>("LOG_FORMAT")? {
            self.logging.format = format;
        }

        if let Some(from) = env_var("EMAIL_FROM") {
            self.email.from = from;
        }
        if let Some(url) = env_var("FRONTEND_URL") {
            self.email.frontend_url = url;
        }

        if let Some(url) = env_var("REDIS_URL") {
            self.redis_url = Some(url);
        }
        if let Some(seed) = parse_env::<bool>("SEED_MOCK_DATA")? {
            self.seed_mock_data = seed;
        }
        if let Some(count) = parse_env::<usize>("SEED_COUNT")? {
            self.seed_count = count;
        }

        Ok(())
    }

    /// Reject configurations that must not reach a deployed environment
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.environment.allows_insecure_defaults() && self.auth.jwt.is_using_default_secret() {
            return Err(ConfigError::Missing { name: "JWT_SECRET" });
        }
        if self.auth.jwt.secret.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "JWT_SECRET",
                value: String::new(),
                reason: String::from("secret must not be empty"),
            });
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            return Err(ConfigError::InvalidValue {
                name: "BCRYPT_COST",
                value: self.auth.bcrypt_cost.to_string(),
                reason: String::from("cost must be between 4 and 31"),
            });
        }
        Ok(())
    }
}

/// Parse a duration such as `30s`, `15m`, `12h`, `1d` or a bare number of seconds
pub fn parse_duration(value: &str) -> Result<i64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(String::from("duration is empty"));
    }

    let (digits, multiplier) = match value.char_indices().last() {
        Some((idx, 's')) => (&value[..idx], 1),
        Some((idx, 'm')) => (&value[..idx], 60),
        Some((idx, 'h')) => (&value[..idx], 3600),
        Some((idx, 'd')) => (&value[..idx], 86_400),
        _ => (value, 1),
    };

    let amount: i64 = digits
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a valid duration", value))?;
    if amount <= 0 {
        return Err(String::from("duration must be positive"));
    }
    Ok(amount * multiplier)
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_env<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                name,
                value: raw.clone(),
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

fn duration_env(name: &'static str) -> Result<Option<i64>, ConfigError> {
    match env_var(name) {
        Some(raw) => parse_duration(&raw)
            .map(Some)
            .map_err(|reason| ConfigError::InvalidValue {
                name,
                value: raw,
                reason,
            }),
        None => Ok(None),
    }
}

fn default_seed_count() -> usize {
    20
}
