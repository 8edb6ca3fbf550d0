//! Email delivery module
//!
//! Defines the [`MailTransport`] port used by the dispatch service and its
//! SMTP implementation built on lettre.

mod service;
mod transport;
mod types;

pub use service::SmtpMailer;
pub use transport::{MailError, MailTransport};
pub use types::{EmailMessage, SmtpConfig, DEFAULT_FROM_NAME};
