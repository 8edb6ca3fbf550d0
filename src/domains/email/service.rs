use std::sync::Arc;

use async_trait::async_trait;

use super::model::{EmailKind, SendEmailRequest};
use crate::{
  email::{EmailMessage, MailError, MailTransport},
  templates::{render_password_recovery_email, render_registration_email, PasswordRecoveryEmail, RegistrationEmail},
};

#[derive(Debug, thiserror::Error)]
pub enum SendEmailError {
  #[error("Tipo de email no soportado: {0}")]
  UnsupportedKind(String),
  #[error("Fallo al enviar el correo: {0}")]
  Delivery(#[from] MailError),
}

#[async_trait]
pub trait EmailService: Send + Sync {
  /// Renders and delivers the email described by `req`, returning the message id.
  async fn send_email(&self, req: SendEmailRequest) -> Result<String, SendEmailError>;
}

pub struct EmailServiceImpl {
  transport: Arc<dyn MailTransport>,
  frontend_url: String,
}

impl EmailServiceImpl {
  pub fn new(transport: Arc<dyn MailTransport>, frontend_url: impl Into<String>) -> Self {
    Self {
      transport,
      frontend_url: frontend_url.into(),
    }
  }

  /// Picks subject and body for the request's kind. Does not touch the transport.
  pub fn compose(&self, req: &SendEmailRequest) -> Result<EmailMessage, SendEmailError> {
    let kind: EmailKind = req.kind.parse().map_err(SendEmailError::UnsupportedKind)?;

    let html_body = match kind {
      EmailKind::Registration => {
        let verification_url = format!("{}/auth/verify?token={}", self.frontend_url, req.token);
        render_registration_email(&RegistrationEmail {
          user_name: &req.user_name,
          email: req.email.as_deref().unwrap_or(&req.to),
          temporary_password: req.temporary_password.as_deref().unwrap_or(""),
          verification_url: &verification_url,
        })
      }
      EmailKind::PasswordRecovery => {
        let reset_url = format!("{}/auth/reset-password?token={}", self.frontend_url, req.token);
        render_password_recovery_email(&PasswordRecoveryEmail {
          user_name: &req.user_name,
          reset_url: &reset_url,
        })
      }
    };

    Ok(EmailMessage::new(req.to.clone(), kind.subject(), html_body))
  }
}

#[async_trait]
impl EmailService for EmailServiceImpl {
  async fn send_email(&self, req: SendEmailRequest) -> Result<String, SendEmailError> {
    let message = self.compose(&req)?;

    tracing::info!(kind = %req.kind, to = %req.to, "Sending email");

    let message_id = self.transport.send(&message).await?;

    tracing::info!(message_id = %message_id, "Email sent");

    Ok(message_id)
  }
}
