//! SMTP mailer built on Lettre.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use crate::error::MailError;
use crate::mailer::{MailMessage, Mailer};

/// Sends real mail over SMTP (TLS relay).
///
/// A fresh transport is built per send; alert volume is far too low for
/// connection pooling to matter.
#[derive(Debug, Clone)]
pub struct SmtpMailer {
    relay: String,
    port: u16,
    credentials: Option<Credentials>,
}

impl SmtpMailer {
    pub fn new(relay: impl Into<String>, port: u16) -> Self {
        Self {
            relay: relay.into(),
            port,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, username: String, password: String) -> Self {
        self.credentials = Some(Credentials::new(username, password));
        self
    }

    fn build_transport(&self) -> Result<SmtpTransport, MailError> {
        let mut builder = SmtpTransport::relay(&self.relay)
            .map_err(|e| MailError::Transport(format!("SMTP relay error: {e}")))?
            .port(self.port);
        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(credentials.clone());
        }
        Ok(builder.build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        let mut builder = Message::builder()
            .from(
                message
                    .from
                    .parse()
                    .map_err(|e| MailError::InvalidAddress(format!("from {:?}: {e}", message.from)))?,
            )
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN);
        for recipient in &message.to {
            builder = builder.to(recipient
                .parse()
                .map_err(|e| MailError::InvalidAddress(format!("to {recipient:?}: {e}")))?);
        }
        let email = builder
            .body(message.body.clone())
            .map_err(|e| MailError::Message(e.to_string()))?;

        let transport = self.build_transport()?;

        // Lettre's SMTP send is blocking; keep it off the async workers.
        tokio::task::spawn_blocking(move || {
            transport
                .send(&email)
                .map(|_| ())
                .map_err(|e| MailError::Transport(e.to_string()))
        })
        .await
        .map_err(|e| MailError::Transport(format!("send task failed: {e}")))?
    }
}
