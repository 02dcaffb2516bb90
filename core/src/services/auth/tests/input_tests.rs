use crate::errors::{DomainError, ValidationError};
use crate::services::auth::RegisterInput;

fn input() -> RegisterInput {
    RegisterInput {
        email: Some("  Jane.Doe@Example.COM ".to_string()),
        password: Some("Str0ng!Pass".to_string()),
        first_name: Some("Jane".to_string()),
        last_name: Some("Doe".to_string()),
    }
}

#[test]
fn test_valid_input_normalizes_email() {
    let account = input().validate().unwrap();
    assert_eq!(account.email, "jane.doe@example.com");
    assert_eq!(account.first_name, "Jane");
}

#[test]
fn test_missing_fields_are_listed_in_order() {
    let err = RegisterInput {
        email: Some("a@b.co".to_string()),
        ..RegisterInput::default()
    }
    .validate()
    .unwrap_err();

    assert_eq!(
        err,
        DomainError::ValidationErr(ValidationError::MissingFields {
            fields: vec![
                "password".to_string(),
                "firstName".to_string(),
                "lastName".to_string()
            ],
        })
    );
    assert_eq!(
        err.to_string(),
        "Missing required fields: password, firstName, lastName"
    );
}

#[test]
fn test_blank_name_counts_as_missing() {
    let mut data = input();
    data.last_name = Some("   ".to_string());
    let err = data.validate().unwrap_err();
    assert_eq!(err.to_string(), "Missing required fields: lastName");
}

#[test]
fn test_email_checked_before_password() {
    let mut data = input();
    data.email = Some("not-an-email".to_string());
    data.password = Some("weak".to_string());
    assert_eq!(
        data.validate().unwrap_err(),
        DomainError::ValidationErr(ValidationError::InvalidEmail)
    );
}

#[test]
fn test_weak_password_reports_rule() {
    let mut data = input();
    data.password = Some("alllowercase1!".to_string());
    let err = data.validate().unwrap_err();
    assert!(matches!(
        err,
        DomainError::ValidationErr(ValidationError::WeakPassword { .. })
    ));
    assert!(err.to_string().starts_with("Password does not meet requirements: "));
}
