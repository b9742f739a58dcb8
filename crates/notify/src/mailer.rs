use std::sync::Arc;

use async_trait::async_trait;

use crate::error::MailError;

/// A fully composed outbound email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
    pub from: String,
    pub to: Vec<String>,
}

/// Outbound mail seam.
///
/// Implementations must not retry; callers decide what a failed send means.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

#[async_trait]
impl<M> Mailer for Arc<M>
where
    M: Mailer + ?Sized,
{
    async fn send(&self, message: MailMessage) -> Result<(), MailError> {
        (**self).send(message).await
    }
}
