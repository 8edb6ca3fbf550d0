use std::sync::Arc;

use async_trait::async_trait;
use axum::{
  body::Body,
  http::{Request, StatusCode},
  Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
  app::create_app,
  config::{Config, Environment},
  email::{EmailMessage, MailError, MailTransport, SmtpConfig},
  middleware::auth::API_KEY_HEADER,
  state::SharedAppState,
};

pub const TEST_API_KEY: &str = "test-api-key-0123456789abcdef0123";

mockall::mock! {
  pub Transport {}

  #[async_trait]
  impl MailTransport for Transport {
    async fn send(&self, message: &EmailMessage) -> Result<String, MailError>;
    async fn verify_connection(&self) -> bool;
  }
}

pub fn test_config() -> Config {
  Config {
    port: 0,
    environment: Environment::Test,
    api_key: TEST_API_KEY.to_string(),
    frontend_url: "https://clinic.example.com".to_string(),
    trust_proxy_hops: 1,
    smtp: SmtpConfig {
      host: "localhost".to_string(),
      port: 1025,
      username: "test".to_string(),
      password: "test".to_string(),
      from_email: "noreply@clinic.example.com".to_string(),
      ..SmtpConfig::default()
    },
  }
}

/// A transport failure as lettre would report it for a bad recipient.
pub fn delivery_error() -> MailError {
  MailError::InvalidAddress("not-an-address".parse::<lettre::Address>().unwrap_err())
}

pub fn app_with_transport(transport: MockTransport) -> Router {
  let state = SharedAppState::new(test_config(), Arc::new(transport));
  create_app(state)
}

pub async fn post_json(app: Router, uri: &str, api_key: Option<&str>, body: &Value) -> (StatusCode, Value) {
  post_json_with_headers(app, uri, api_key, &[], body).await
}

pub async fn post_json_with_headers(
  app: Router,
  uri: &str,
  api_key: Option<&str>,
  headers: &[(&str, &str)],
  body: &Value,
) -> (StatusCode, Value) {
  let mut request = Request::builder()
    .method("POST")
    .uri(uri)
    .header("content-type", "application/json");
  if let Some(key) = api_key {
    request = request.header(API_KEY_HEADER, key);
  }
  for (name, value) in headers {
    request = request.header(*name, *value);
  }
  let request = request
    .body(Body::from(serde_json::to_vec(body).expect("serialize request body")))
    .expect("build request");

  send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
  let request = Request::builder()
    .method("GET")
    .uri(uri)
    .body(Body::empty())
    .expect("build request");

  send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
  let response = app.oneshot(request).await.expect("handle request");
  let status = response.status();
  let body = axum::body::to_bytes(response.into_body(), usize::MAX)
    .await
    .expect("read response body");
  let json = serde_json::from_slice(&body).expect("json response body");
  (status, json)
}
