//! Utility functions shared across crates

pub mod validation;

pub use validation::{
    check_password_strength, is_valid_email, is_valid_phone, is_valid_zip, normalize_email,
    PasswordRule,
};
