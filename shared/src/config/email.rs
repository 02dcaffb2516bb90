//! Outgoing email configuration

use serde::{Deserialize, Serialize};

/// Email settings used to build verification and reset links
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    /// Sender address
    pub from: String,

    /// Base URL of the frontend that hosts the verification and reset pages
    pub frontend_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from: String::from("no-reply@order-processing.local"),
            frontend_url: String::from("http://localhost:3000"),
        }
    }
}
