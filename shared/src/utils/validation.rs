//! Common validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").unwrap()
});

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").unwrap());

static ZIP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{5}$").unwrap());

/// Characters accepted as the special character of a password
pub const PASSWORD_SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// The first password rule a candidate fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    MinLength,
    Uppercase,
    Lowercase,
    Digit,
    SpecialCharacter,
}

impl PasswordRule {
    pub fn message(&self) -> &'static str {
        match self {
            PasswordRule::MinLength => "Password must be at least 8 characters long",
            PasswordRule::Uppercase => "Password must contain at least one uppercase letter",
            PasswordRule::Lowercase => "Password must contain at least one lowercase letter",
            PasswordRule::Digit => "Password must contain at least one number",
            PasswordRule::SpecialCharacter => {
                "Password must contain at least one special character"
            }
        }
    }
}

impl std::fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Check a password against the strength rules, in order
pub fn check_password_strength(password: &str) -> Result<(), PasswordRule> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordRule::MinLength);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordRule::Uppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordRule::Lowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordRule::Digit);
    }
    if !password.chars().any(|c| PASSWORD_SPECIAL_CHARS.contains(c)) {
        return Err(PasswordRule::SpecialCharacter);
    }
    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email.trim())
}

/// Lowercase and trim an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// US phone number in the form `(555) 123-4567`
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_REGEX.is_match(phone)
}

/// Five digit US zip code
pub fn is_valid_zip(zip: &str) -> bool {
    ZIP_REGEX.is_match(zip)
}
