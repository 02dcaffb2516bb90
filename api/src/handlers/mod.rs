//! Request handling helpers shared by the route modules

pub mod error;

pub use error::{account_err, ApiError, ErrorFamily};
