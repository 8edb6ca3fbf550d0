use async_trait::async_trait;
use lettre::{
  message::{header::ContentType, Mailbox},
  transport::smtp::authentication::Credentials,
  AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::email::{
  transport::{MailError, MailTransport},
  types::{EmailMessage, SmtpConfig},
};

const IMPLICIT_TLS_PORT: u16 = 465;

pub struct SmtpMailer {
  smtp_config: SmtpConfig,
  transporter: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
  pub fn new(smtp_config: SmtpConfig) -> Result<Self, MailError> {
    let creds = Credentials::new(smtp_config.username.clone(), smtp_config.password.clone());

    let transporter = if smtp_config.is_local() {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp_config.host)
        .credentials(creds)
        .port(smtp_config.port)
        .build()
    } else if smtp_config.port == IMPLICIT_TLS_PORT {
      AsyncSmtpTransport::<Tokio1Executor>::relay(&smtp_config.host)?
        .credentials(creds)
        .port(smtp_config.port)
        .build()
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp_config.host)?
        .credentials(creds)
        .port(smtp_config.port)
        .build()
    };

    Ok(SmtpMailer {
      smtp_config,
      transporter,
    })
  }

  fn default_sender(&self) -> Result<Mailbox, MailError> {
    let address = self.smtp_config.from_email.parse()?;
    Ok(Mailbox::new(Some(self.smtp_config.from_name.clone()), address))
  }

  fn new_message_id(&self) -> String {
    format!("<{}@{}>", Uuid::new_v4(), self.smtp_config.sender_domain())
  }

  /// Turns an [`EmailMessage`] into a lettre message, returning the assigned Message-ID with it.
  fn build_message(&self, message: &EmailMessage) -> Result<(String, Message), MailError> {
    let from = match &message.from {
      Some(from) => from.parse()?,
      None => self.default_sender()?,
    };
    let message_id = self.new_message_id();

    let email = Message::builder()
      .from(from)
      .to(message.to.parse()?)
      .subject(&message.subject)
      .message_id(Some(message_id.clone()))
      .header(ContentType::TEXT_HTML)
      .body(message.html_body.clone())?;

    Ok((message_id, email))
  }
}

#[async_trait]
impl MailTransport for SmtpMailer {
  async fn send(&self, message: &EmailMessage) -> Result<String, MailError> {
    let result = match self.build_message(message) {
      Ok((message_id, email)) => self.transporter.send(email).await.map(|_| message_id).map_err(MailError::from),
      Err(e) => Err(e),
    };

    match &result {
      Ok(message_id) => tracing::debug!(message_id = %message_id, "Email handed to SMTP server"),
      Err(e) => tracing::error!(to = %message.to, error = %e, "Failed to send email"),
    }

    result
  }

  async fn verify_connection(&self) -> bool {
    match self.transporter.test_connection().await {
      Ok(true) => {
        tracing::info!(host = %self.smtp_config.host, "SMTP connection verified");
        true
      }
      Ok(false) => {
        tracing::error!(host = %self.smtp_config.host, "SMTP server did not accept the connection");
        false
      }
      Err(e) => {
        tracing::error!(host = %self.smtp_config.host, error = %e, "Failed to verify SMTP connection");
        false
      }
    }
  }
}
