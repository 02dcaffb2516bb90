//! Email delivery that writes messages to the log
//!
//! No mail is sent. Messages are logged and kept in an outbox so tests and
//! local development can read verification and reset links.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use op_core::services::email::{EmailError, EmailMessage, EmailSender};
use op_shared::config::EmailConfig;

pub struct LogEmailSender {
    from: String,
    outbox: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

impl LogEmailSender {
    pub fn new(config: &EmailConfig) -> Self {
        Self {
            from: config.from.clone(),
            outbox: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    /// Make every following send fail, or succeed again
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Copy of every delivered message, oldest first
    pub fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }

    pub fn last_message_to(&self, recipient: &str) -> Option<EmailMessage> {
        self.outbox().into_iter().rev().find(|m| m.to == recipient)
    }
}

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<String, EmailError> {
        if self.fail.load(Ordering::SeqCst) {
            warn!(target: "email", to = %message.to, subject = %message.subject, "Email delivery failed");
            return Err(EmailError(format!("delivery to {} failed", message.to)));
        }

        let domain = self.from.rsplit('@').next().unwrap_or("localhost");
        let message_id = format!("<{}@{}>", Uuid::new_v4(), domain);
        info!(
            target: "email",
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            message_id = %message_id,
            "Email sent\n{}",
            message.text
        );

        self.outbox
            .lock()
            .map_err(|_| EmailError("outbox lock poisoned".to_string()))?
            .push(message);
        Ok(message_id)
    }
}
