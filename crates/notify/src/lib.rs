//! Staff notifications: the mail seam and the popularity alert on top of it.
//!
//! Delivery transports live behind the [`Mailer`] trait so the rest of the
//! system never talks SMTP directly.

pub mod console;
pub mod error;
pub mod in_memory;
pub mod mailer;
pub mod popularity;
pub mod smtp;

pub use console::ConsoleMailer;
pub use error::MailError;
pub use in_memory::RecordingMailer;
pub use mailer::{MailMessage, Mailer};
pub use popularity::{Company, PopularityNotifier};
pub use smtp::SmtpMailer;
