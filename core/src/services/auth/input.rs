//! Registration input and its validation

use op_shared::validation::{check_password_strength, is_valid_email, normalize_email};

use crate::errors::{DomainError, ValidationError};

/// Raw registration fields as received
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Registration fields after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    /// Normalized email
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl RegisterInput {
    /// Checks presence, then email format, then password strength
    pub fn validate(&self) -> Result<NewAccount, DomainError> {
        let password = self.password.as_deref().filter(|p| !p.is_empty());
        let (email, password, first_name, last_name) = match (
            present(&self.email),
            password,
            present(&self.first_name),
            present(&self.last_name),
        ) {
            (Some(e), Some(p), Some(f), Some(l)) => (e, p, f, l),
            (e, p, f, l) => {
                let fields = [
                    ("email", e.is_none()),
                    ("password", p.is_none()),
                    ("firstName", f.is_none()),
                    ("lastName", l.is_none()),
                ]
                .into_iter()
                .filter(|(_, missing)| *missing)
                .map(|(name, _)| name.to_string())
                .collect();
                return Err(ValidationError::MissingFields { fields }.into());
            }
        };

        if !is_valid_email(email) {
            return Err(ValidationError::InvalidEmail.into());
        }
        check_password_strength(password).map_err(|rule| ValidationError::WeakPassword {
            reason: rule.message().to_string(),
        })?;

        Ok(NewAccount {
            email: normalize_email(email),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }
}
