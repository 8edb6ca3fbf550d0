pub const DEFAULT_FROM_NAME: &str = "Centro Médico Urdiales-Espinoza";

#[derive(Debug, Clone)]
pub struct SmtpConfig {
  pub host: String,
  pub port: u16,
  pub username: String,
  pub password: String,
  pub from_email: String,
  pub from_name: String,
}

impl Default for SmtpConfig {
  fn default() -> Self {
    SmtpConfig {
      host: "smtp.gmail.com".to_string(),
      port: 465,
      username: "".to_string(),
      password: "".to_string(),
      from_email: "".to_string(),
      from_name: DEFAULT_FROM_NAME.to_string(),
    }
  }
}

impl SmtpConfig {
  /// Hosts that speak plain SMTP without TLS (local catchers).
  pub fn is_local(&self) -> bool {
    self.host == "localhost" || self.host == "mailhog"
  }

  pub fn sender_domain(&self) -> &str {
    self.from_email.rsplit_once('@').map(|(_, domain)| domain).unwrap_or("localhost")
  }
}

/// A fully composed email, ready to be handed to a [`super::MailTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
  pub to: String,
  pub subject: String,
  pub html_body: String,
  pub from: Option<String>,
}

impl EmailMessage {
  pub fn new(to: impl Into<String>, subject: impl Into<String>, html_body: impl Into<String>) -> Self {
    EmailMessage {
      to: to.into(),
      subject: subject.into(),
      html_body: html_body.into(),
      from: None,
    }
  }
}
