use serde_json::Value;
use validator::{Validate, ValidationError};

use super::model::{EmailKind, SendEmailPayload, SendEmailRequest};

pub const INVALID_INPUT: &str = "Datos de entrada inválidos";

const NOT_AN_OBJECT: &str = "body: El cuerpo de la solicitud debe ser un objeto JSON";

/// Wire path and struct field name of every validated field, in report order.
const FIELDS: [(&str, &str); 6] = [
  ("to", "to"),
  ("type", "kind"),
  ("userName", "user_name"),
  ("token", "token"),
  ("email", "email"),
  ("temporaryPassword", "temporary_password"),
];

const TYPE_FIELD: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", INVALID_INPUT)]
pub struct ValidationFailure {
  pub details: Vec<String>,
}

impl ValidationFailure {
  pub fn new(details: Vec<String>) -> Self {
    Self { details }
  }
}

/// Checks an untrusted JSON body and returns the typed request, or every
/// violated constraint as `"<field>: <message>"`.
pub fn validate(raw: Value) -> Result<SendEmailRequest, ValidationFailure> {
  let Value::Object(mut body) = raw else {
    return Err(ValidationFailure::new(vec![NOT_AN_OBJECT.to_string()]));
  };

  let mut violations: Vec<(usize, String)> = Vec::new();
  let mut mistyped = [false; FIELDS.len()];

  for (index, (path, _)) in FIELDS.iter().enumerate() {
    match body.get(*path) {
      None | Some(Value::Null) | Some(Value::String(_)) => {}
      Some(_) => {
        violations.push((index, format_violation(path, "debe ser una cadena de texto")));
        mistyped[index] = true;
        body.remove(*path);
      }
    }
  }

  let payload: SendEmailPayload = serde_json::from_value(Value::Object(body))
    .map_err(|e| ValidationFailure::new(vec![format!("body: {}", e)]))?;

  if let Err(errors) = payload.validate() {
    for (field, field_errors) in errors.field_errors() {
      let Some(index) = field_index(&field) else {
        continue;
      };
      if mistyped[index] {
        continue;
      }
      let path = FIELDS[index].0;
      for error in field_errors.iter() {
        let violation = format_violation(path, &describe(error, field_value(&payload, path)));
        if !violations.iter().any(|(i, existing)| *i == index && *existing == violation) {
          violations.push((index, violation));
        }
      }
    }
  }

  let known_kind = payload.kind.as_deref().is_some_and(|kind| kind.parse::<EmailKind>().is_ok());
  if !mistyped[TYPE_FIELD] && !known_kind {
    violations.push((
      TYPE_FIELD,
      format_violation("type", "debe ser \"registration\" o \"password-recovery\""),
    ));
  }

  if !violations.is_empty() {
    violations.sort_by_key(|(index, _)| *index);
    return Err(ValidationFailure::new(
      violations.into_iter().map(|(_, message)| message).collect(),
    ));
  }

  let SendEmailPayload {
    to: Some(to),
    kind: Some(kind),
    user_name: Some(user_name),
    token: Some(token),
    email,
    temporary_password,
  } = payload
  else {
    return Err(ValidationFailure::new(vec!["body: campos requeridos ausentes".to_string()]));
  };

  Ok(SendEmailRequest {
    to,
    kind,
    user_name,
    token,
    email,
    temporary_password,
  })
}

fn field_index(name: &str) -> Option<usize> {
  FIELDS
    .iter()
    .position(|(path, field)| *path == name || *field == name)
}

fn field_value<'a>(payload: &'a SendEmailPayload, path: &str) -> Option<&'a str> {
  match path {
    "to" => payload.to.as_deref(),
    "type" => payload.kind.as_deref(),
    "userName" => payload.user_name.as_deref(),
    "token" => payload.token.as_deref(),
    "email" => payload.email.as_deref(),
    "temporaryPassword" => payload.temporary_password.as_deref(),
    _ => None,
  }
}

fn format_violation(path: &str, message: &str) -> String {
  format!("{path}: El campo \"{path}\" {message}")
}

fn describe(error: &ValidationError, value: Option<&str>) -> String {
  match &*error.code {
    "required" => "es requerido".to_string(),
    "email" => "debe ser un correo electrónico válido".to_string(),
    "length" => {
      let len = value.map(|v| v.chars().count() as u64).unwrap_or(0);
      let min = error.params.get("min").and_then(Value::as_u64);
      let max = error.params.get("max").and_then(Value::as_u64);
      match (min, max) {
        (Some(1), _) if len < 1 => "es requerido".to_string(),
        (Some(min), _) if len < min => format!("debe tener al menos {} caracteres", min),
        (_, Some(max)) if len > max => format!("no puede exceder {} caracteres", max),
        _ => "tiene una longitud inválida".to_string(),
      }
    }
    other => format!("no es válido ({})", other),
  }
}
