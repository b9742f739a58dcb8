use async_trait::async_trait;
use tracing::info;

use crate::error::MailError;
use crate::mailer::{MailMessage, Mailer};

/// Logs mail instead of sending it. Used when no SMTP relay is configured
/// (dev and test wiring).
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMailer;

impl ConsoleMailer {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Mailer for ConsoleMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        info!(
            to = ?message.to,
            subject = %message.subject,
            "mail not sent (console mailer)"
        );
        Ok(())
    }
}
