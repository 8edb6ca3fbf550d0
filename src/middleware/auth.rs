use axum::{
  extract::{Request, State},
  middleware::Next,
  response::Response,
};

use crate::{
  state::SharedAppState,
  utils::{request_client_ip, secrets_match},
  AppError,
};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests whose `X-API-Key` header does not match the configured key.
pub async fn require_api_key(State(state): State<SharedAppState>, req: Request, next: Next) -> Result<Response, AppError> {
  let rejection = match req.headers().get(API_KEY_HEADER) {
    None => Some(("Request without API key", "API Key requerida")),
    Some(value) if value.is_empty() => Some(("Request without API key", "API Key requerida")),
    Some(value) if !secrets_match(value.as_bytes(), state.config.api_key.as_bytes()) => {
      Some(("Invalid API key", "API Key inválida"))
    }
    Some(_) => None,
  };

  if let Some((reason, message)) = rejection {
    tracing::warn!(ip = %request_client_ip(&req, state.config.trust_proxy_hops), "{}", reason);
    return Err(AppError::unauthorized(message));
  }

  Ok(next.run(req).await)
}
