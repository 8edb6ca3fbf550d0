use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// The closed set of transactional emails this service can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmailKind {
  Registration,
  PasswordRecovery,
}

impl EmailKind {
  pub const ALL: [EmailKind; 2] = [EmailKind::Registration, EmailKind::PasswordRecovery];

  pub fn as_str(&self) -> &'static str {
    match self {
      EmailKind::Registration => "registration",
      EmailKind::PasswordRecovery => "password-recovery",
    }
  }

  pub fn subject(&self) -> &'static str {
    match self {
      EmailKind::Registration => "¡Bienvenido/a al Centro Médico - Verificación de Cuenta",
      EmailKind::PasswordRecovery => "Recuperación de Contraseña - Centro Médico",
    }
  }
}

impl fmt::Display for EmailKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for EmailKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    EmailKind::ALL
      .into_iter()
      .find(|kind| kind.as_str() == s)
      .ok_or_else(|| s.to_string())
  }
}

/// Raw body of `POST /emails/send` before validation. Every field is optional
/// here so that all violations can be reported together.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SendEmailPayload {
  #[validate(required, email, custom(function = "dotted_domain"))]
  pub to: Option<String>,
  #[serde(rename = "type")]
  pub kind: Option<String>,
  #[serde(rename = "userName")]
  #[validate(required, length(min = 1, max = 100))]
  pub user_name: Option<String>,
  #[validate(required, length(min = 10, max = 512))]
  pub token: Option<String>,
  #[validate(email, custom(function = "dotted_domain"))]
  pub email: Option<String>,
  #[serde(rename = "temporaryPassword")]
  #[validate(length(min = 6))]
  pub temporary_password: Option<String>,
}

/// Rejects addresses whose domain is a single label such as `localhost`,
/// which the `email` rule accepts.
fn dotted_domain(address: &str) -> Result<(), ValidationError> {
  match address.rsplit_once('@') {
    Some((_, domain)) if !domain.contains('.') => Err(ValidationError::new("email")),
    _ => Ok(()),
  }
}

/// A request that passed validation. `kind` keeps the wire value; the dispatch
/// service parses it again before sending.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SendEmailRequest {
  pub to: String,
  #[serde(rename = "type")]
  pub kind: String,
  #[serde(rename = "userName")]
  pub user_name: String,
  pub token: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(rename = "temporaryPassword", skip_serializing_if = "Option::is_none")]
  pub temporary_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
  pub success: bool,
  pub message_id: String,
  pub message: String,
}

impl SendEmailResponse {
  pub fn sent(message_id: String) -> Self {
    Self {
      success: true,
      message_id,
      message: "Correo enviado exitosamente".to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_email_kind_parses_wire_names() {
    assert_eq!("registration".parse::<EmailKind>(), Ok(EmailKind::Registration));
    assert_eq!("password-recovery".parse::<EmailKind>(), Ok(EmailKind::PasswordRecovery));
    assert_eq!("newsletter".parse::<EmailKind>(), Err("newsletter".to_string()));
  }

  #[test]
  fn test_email_kind_serde_matches_as_str() {
    for kind in EmailKind::ALL {
      let json = serde_json::to_string(&kind).expect("serialize kind");
      assert_eq!(json, format!("\"{}\"", kind.as_str()));
    }
  }

  #[test]
  fn test_send_email_response_shape() {
    let response = SendEmailResponse::sent("<abc@example.com>".to_string());
    let json = serde_json::to_value(&response).expect("serialize response");

    assert_eq!(
      json,
      serde_json::json!({
        "success": true,
        "messageId": "<abc@example.com>",
        "message": "Correo enviado exitosamente",
      })
    );
  }
}
