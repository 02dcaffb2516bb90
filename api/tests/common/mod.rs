#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use op_api::{AppState, Repositories};
use op_infra::{InMemoryRateLimitStore, LogEmailSender};
use op_shared::config::AppConfig;

pub const PASSWORD: &str = "Passw0rd!";

/// App state plus handles on the pieces tests inspect
pub struct Harness {
    pub state: web::Data<AppState>,
    pub email: Arc<LogEmailSender>,
    pub repositories: Repositories,
}

pub fn harness() -> Harness {
    harness_with(AppConfig::test())
}

pub fn harness_with(config: AppConfig) -> Harness {
    let repositories = Repositories::in_memory();
    let email = Arc::new(LogEmailSender::new(&config.email));
    let state = AppState::new(
        config,
        &repositories,
        email.clone(),
        Arc::new(InMemoryRateLimitStore::new()),
    );

    Harness {
        state: web::Data::new(state),
        email,
        repositories,
    }
}

/// Token at the end of the link in the last email sent to `recipient`
pub fn token_from_email(email: &LogEmailSender, recipient: &str, path: &str) -> String {
    let message = email
        .last_message_to(recipient)
        .expect("no email for recipient");
    let marker = format!("/{}/", path);
    let start = message.text.find(&marker).expect("no link in email") + marker.len();
    message.text[start..]
        .split_whitespace()
        .next()
        .expect("empty token")
        .to_string()
}

pub fn register_body(email: &str) -> serde_json::Value {
    serde_json::json!({
        "email": email,
        "password": PASSWORD,
        "firstName": "Ada",
        "lastName": "Lovelace",
    })
}
