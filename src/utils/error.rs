use axum::{
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use serde::Serialize;

use crate::domains::email::validation::{ValidationFailure, INVALID_INPUT};

pub const INTERNAL_ERROR_MESSAGE: &str = "Error interno del servidor";

#[derive(Debug)]
pub struct AppError {
  pub status_code: StatusCode,
  pub message: String,
  pub details: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
  success: bool,
  error: &'a str,
  #[serde(skip_serializing_if = "Option::is_none")]
  details: Option<&'a [String]>,
}

impl AppError {
  pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status_code,
      message: message.into(),
      details: None,
    }
  }

  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_REQUEST, message)
  }

  pub fn unauthorized(message: impl Into<String>) -> Self {
    Self::new(StatusCode::UNAUTHORIZED, message)
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self::new(StatusCode::NOT_FOUND, message)
  }

  pub fn too_many_requests(message: impl Into<String>) -> Self {
    Self::new(StatusCode::TOO_MANY_REQUESTS, message)
  }

  pub fn bad_gateway(message: impl Into<String>) -> Self {
    Self::new(StatusCode::BAD_GATEWAY, message)
  }

  /// A 500 whose text is only shown to the client when `expose` is set.
  pub fn internal_server_error(message: impl Into<String>, expose: bool) -> Self {
    let message = message.into();
    tracing::error!("Internal error: {}", message);
    if expose {
      Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    } else {
      Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }
  }

  pub fn with_details(mut self, details: Vec<String>) -> Self {
    self.details = Some(details);
    self
  }
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let body = ErrorBody {
      success: false,
      error: &self.message,
      details: self.details.as_deref(),
    };

    (self.status_code, Json(body)).into_response()
  }
}

impl From<ValidationFailure> for AppError {
  fn from(failure: ValidationFailure) -> Self {
    tracing::warn!(details = ?failure.details, "Rejected invalid email request");
    AppError::bad_request(failure.to_string()).with_details(failure.details)
  }
}

impl From<JsonRejection> for AppError {
  fn from(rejection: JsonRejection) -> Self {
    tracing::warn!("JSON error: {}", rejection.body_text());
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
      return AppError::new(StatusCode::PAYLOAD_TOO_LARGE, "Cuerpo de la solicitud demasiado grande");
    }
    AppError::bad_request(INVALID_INPUT).with_details(vec![format!("body: {}", rejection.body_text())])
  }
}
