use thiserror::Error;

/// Mail delivery error. Never swallowed: transport failures propagate to the
/// request that triggered the send.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("failed to build mail message: {0}")]
    Message(String),

    #[error("mail transport failed: {0}")]
    Transport(String),
}
