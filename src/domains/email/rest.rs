use axum::{
  extract::{rejection::JsonRejection, Json, State},
  middleware,
  response::Json as JsonResponse,
  routing::post,
  Router,
};
use serde_json::Value;

use super::{
  model::SendEmailResponse,
  service::SendEmailError,
  validation,
};
use crate::{
  config::Environment,
  middleware::{auth::require_api_key, rate_limit::send_rate_limit},
  state::{AppState, SharedAppState},
  AppError,
};

fn map_send_email_error(e: SendEmailError, environment: Environment) -> AppError {
  match e {
    SendEmailError::Delivery(_) => {
      tracing::error!("Email delivery failed: {}", e);
      AppError::bad_gateway(e.to_string())
    }
    SendEmailError::UnsupportedKind(_) => AppError::internal_server_error(e.to_string(), environment.is_development()),
  }
}

/// Routes under `/emails`. Layers run outermost first: API key, then the
/// send quota, then the handler (which validates the body).
pub fn email_routes(state: SharedAppState) -> Router<SharedAppState> {
  Router::new()
    .route("/emails/send", post(send_email_handler))
    .route_layer(middleware::from_fn_with_state(state.clone(), send_rate_limit))
    .route_layer(middleware::from_fn_with_state(state, require_api_key))
}

pub async fn send_email_handler(
  State(state): State<SharedAppState>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<JsonResponse<SendEmailResponse>, AppError> {
  let Json(raw) = payload?;
  let request = validation::validate(raw)?;

  state
    .send_email(request)
    .await
    .map(|message_id| JsonResponse(SendEmailResponse::sent(message_id)))
    .map_err(|e| map_send_email_error(e, state.config.environment))
}

#[cfg(test)]
mod tests {
  use crate::{
    middleware::rate_limit::SEND_REQUESTS_PER_MINUTE,
    test_support::{
      app_with_transport, delivery_error, post_json, post_json_with_headers, MockTransport, TEST_API_KEY,
    },
  };
  use axum::http::StatusCode;
  use serde_json::{json, Value};

  const SEND_URI: &str = "/api/v1/emails/send";

  fn registration_payload() -> Value {
    json!({
      "to": "ana@example.com",
      "type": "registration",
      "userName": "Ana Torres",
      "token": "abcdefghij0123456789",
      "temporaryPassword": "Temp1234",
    })
  }

  fn recovery_payload() -> Value {
    json!({
      "to": "jorge@example.com",
      "type": "password-recovery",
      "userName": "Jorge",
      "token": "reset-token-0001",
    })
  }

  fn accepting_transport(times: usize) -> MockTransport {
    let mut transport = MockTransport::new();
    transport
      .expect_send()
      .times(times)
      .returning(|_| Ok("<msg-1@clinic.example.com>".to_string()));
    transport
  }

  #[tokio::test]
  async fn send_registration_returns_message_id() {
    let mut transport = MockTransport::new();
    transport
      .expect_send()
      .withf(|message| {
        message.to == "ana@example.com"
          && message.html_body.contains("Ana Torres")
          && message.html_body.contains(">ana@example.com</td>")
          && message.html_body.contains("Temp1234")
          && message
            .html_body
            .contains("https://clinic.example.com/auth/verify?token=abcdefghij0123456789")
      })
      .times(1)
      .returning(|_| Ok("<msg-1@clinic.example.com>".to_string()));
    let app = app_with_transport(transport);

    let (status, body) = post_json(app, SEND_URI, Some(TEST_API_KEY), &registration_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
      body,
      json!({
        "success": true,
        "messageId": "<msg-1@clinic.example.com>",
        "message": "Correo enviado exitosamente",
      })
    );
  }

  #[tokio::test]
  async fn send_password_recovery_builds_reset_link() {
    let mut transport = MockTransport::new();
    transport
      .expect_send()
      .withf(|message| {
        message.subject == "Recuperación de Contraseña - Centro Médico"
          && message.html_body.contains("expirará en 15 minutos")
          && message
            .html_body
            .contains("https://clinic.example.com/auth/reset-password?token=reset-token-0001")
      })
      .times(1)
      .returning(|_| Ok("<msg-2@clinic.example.com>".to_string()));
    let app = app_with_transport(transport);

    let (status, body) = post_json(app, SEND_URI, Some(TEST_API_KEY), &recovery_payload()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messageId"], "<msg-2@clinic.example.com>");
  }

  #[tokio::test]
  async fn send_invalid_recipient_returns_bad_request() {
    let app = app_with_transport(accepting_transport(0));
    let mut payload = registration_payload();
    payload["to"] = json!("not-an-email");

    let (status, body) = post_json(app, SEND_URI, Some(TEST_API_KEY), &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Datos de entrada inválidos");

    let details = body["details"].as_array().expect("details array");
    assert!(details.iter().any(|d| d.as_str().is_some_and(|d| d.starts_with("to:"))));
  }

  #[tokio::test]
  async fn send_reports_every_violated_field() {
    let app = app_with_transport(accepting_transport(0));
    let payload = json!({
      "token": "short",
      "userName": "",
      "to": "nope",
      "type": "newsletter",
    });

    let (status, body) = post_json(app, SEND_URI, Some(TEST_API_KEY), &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let details = body["details"].as_array().expect("details array");
    assert_eq!(details.len(), 4);
    assert!(details[0].as_str().is_some_and(|d| d.starts_with("to:")));
    assert!(details[1].as_str().is_some_and(|d| d.starts_with("type:")));
    assert!(details[2].as_str().is_some_and(|d| d.starts_with("userName:")));
    assert!(details[3].as_str().is_some_and(|d| d.starts_with("token:")));
  }

  #[tokio::test]
  async fn send_malformed_json_returns_bad_request() {
    let app = app_with_transport(accepting_transport(0));
    let request = axum::http::Request::builder()
      .method("POST")
      .uri(SEND_URI)
      .header("content-type", "application/json")
      .header("x-api-key", TEST_API_KEY)
      .body(axum::body::Body::from("{\"to\": "))
      .unwrap();

    let response = tower::ServiceExt::oneshot(app, request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn send_with_wrong_api_key_never_reaches_transport() {
    let app = app_with_transport(accepting_transport(0));

    let (status, body) = post_json(app, SEND_URI, Some("wrong-key"), &registration_payload()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "success": false, "error": "API Key inválida" }));
  }

  #[tokio::test]
  async fn send_without_api_key_is_unauthorized() {
    let app = app_with_transport(accepting_transport(0));

    let (status, body) = post_json(app, SEND_URI, None, &registration_payload()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "API Key requerida");
  }

  #[tokio::test]
  async fn send_is_rate_limited_after_ten_requests() {
    let app = app_with_transport(accepting_transport(SEND_REQUESTS_PER_MINUTE));

    for _ in 0..SEND_REQUESTS_PER_MINUTE {
      let (status, _) = post_json(app.clone(), SEND_URI, Some(TEST_API_KEY), &recovery_payload()).await;
      assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = post_json(app, SEND_URI, Some(TEST_API_KEY), &recovery_payload()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Límite de envíos excedido. Por favor, espere un momento.");
  }

  #[tokio::test]
  async fn send_limit_keys_on_hop_appended_by_proxy() {
    let app = app_with_transport(accepting_transport(SEND_REQUESTS_PER_MINUTE + 1));

    for i in 0..SEND_REQUESTS_PER_MINUTE {
      let forwarded = format!("203.0.113.{i}, 10.0.0.1");
      let (status, _) = post_json_with_headers(
        app.clone(),
        SEND_URI,
        Some(TEST_API_KEY),
        &[("x-forwarded-for", forwarded.as_str())],
        &recovery_payload(),
      )
      .await;
      assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = post_json_with_headers(
      app.clone(),
      SEND_URI,
      Some(TEST_API_KEY),
      &[("x-forwarded-for", "203.0.113.99, 10.0.0.1")],
      &recovery_payload(),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);

    let (status, _) = post_json_with_headers(
      app,
      SEND_URI,
      Some(TEST_API_KEY),
      &[("x-forwarded-for", "203.0.113.99, 10.0.0.2")],
      &recovery_payload(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
  }

  #[tokio::test]
  async fn send_oversized_body_returns_payload_too_large() {
    let app = app_with_transport(accepting_transport(0));
    let mut payload = recovery_payload();
    payload["userName"] = json!("x".repeat(11 * 1024));

    let (status, body) = post_json(app, SEND_URI, Some(TEST_API_KEY), &payload).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["success"], false);
  }

  #[tokio::test]
  async fn send_transport_failure_returns_bad_gateway() {
    let mut transport = MockTransport::new();
    transport.expect_send().times(1).returning(|_| Err(delivery_error()));
    let app = app_with_transport(transport);

    let (status, body) = post_json(app, SEND_URI, Some(TEST_API_KEY), &recovery_payload()).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
    assert!(body["error"]
      .as_str()
      .is_some_and(|e| e.starts_with("Fallo al enviar el correo: ")));
  }
}
