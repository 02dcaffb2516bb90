mod input_tests;
mod service_tests;

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::services::email::{EmailError, EmailMessage, EmailSender};

/// Email sender that keeps every message and can be told to fail
#[derive(Default)]
pub(crate) struct RecordingEmailSender {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

impl RecordingEmailSender {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Token embedded in the last link sent under `path`
    pub fn last_token(&self, path: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let marker = format!("/{}/", path);
        sent.iter().rev().find_map(|message| {
            let start = message.text.find(&marker)? + marker.len();
            Some(
                message.text[start..]
                    .chars()
                    .take_while(|c| c.is_ascii_hexdigit())
                    .collect(),
            )
        })
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<String, EmailError> {
        if self.fail {
            return Err(EmailError("smtp unavailable".to_string()));
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(message);
        Ok(format!("test-{}", sent.len()))
    }
}
