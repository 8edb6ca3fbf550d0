use async_trait::async_trait;

use super::types::EmailMessage;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
  #[error("invalid address: {0}")]
  InvalidAddress(#[from] lettre::address::AddressError),
  #[error("could not build message: {0}")]
  Build(#[from] lettre::error::Error),
  #[error("smtp error: {0}")]
  Smtp(#[from] lettre::transport::smtp::Error),
}

/// Outbound delivery port used by the dispatch service.
///
/// Implementations make exactly one delivery attempt per `send` call and
/// report the identifier the provider (or the mailer) assigned to the message.
#[async_trait]
pub trait MailTransport: Send + Sync {
  async fn send(&self, message: &EmailMessage) -> Result<String, MailError>;

  /// Best-effort reachability probe. Never fails, only reports.
  async fn verify_connection(&self) -> bool;
}
