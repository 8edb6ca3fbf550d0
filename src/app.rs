use axum::{
  extract::{DefaultBodyLimit, State},
  http::{header, HeaderValue, Method},
  middleware,
  response::Json as JsonResponse,
  routing::get,
  Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tower_http::{
  cors::{AllowOrigin, Any, CorsLayer},
  set_header::SetResponseHeaderLayer,
  trace::TraceLayer,
};

use crate::{
  config::Config,
  domains::email::rest::email_routes,
  middleware::{auth::API_KEY_HEADER, rate_limit::global_rate_limit},
  state::SharedAppState,
  AppError,
};

const MAX_BODY_BYTES: usize = 10 * 1024;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
  pub status: String,
  pub timestamp: String,
  pub uptime: f64,
  pub environment: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceInfo {
  pub service: String,
  pub version: String,
  pub status: String,
}

pub fn create_app(state: SharedAppState) -> Router {
  let cors = cors_layer(&state.config);

  Router::new()
    .route("/", get(service_info_handler))
    .route("/health", get(health_handler))
    .nest("/api/v1", email_routes(state.clone()))
    .fallback(not_found_handler)
    .method_not_allowed_fallback(not_found_handler)
    .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
    .layer(middleware::from_fn_with_state(state.clone(), global_rate_limit))
    .layer(cors)
    .layer(SetResponseHeaderLayer::if_not_present(
      header::X_CONTENT_TYPE_OPTIONS,
      HeaderValue::from_static("nosniff"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
      header::X_FRAME_OPTIONS,
      HeaderValue::from_static("SAMEORIGIN"),
    ))
    .layer(SetResponseHeaderLayer::if_not_present(
      header::REFERRER_POLICY,
      HeaderValue::from_static("no-referrer"),
    ))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
  let cors = CorsLayer::new()
    .allow_methods([Method::GET, Method::POST])
    .allow_headers([header::CONTENT_TYPE, header::HeaderName::from_static(API_KEY_HEADER)]);

  if !config.environment.is_production() {
    return cors.allow_origin(Any);
  }

  match HeaderValue::from_str(&config.frontend_url) {
    Ok(origin) => cors.allow_origin(AllowOrigin::exact(origin)),
    Err(_) => {
      tracing::warn!("FRONTEND_URL is not a valid origin, cross-origin requests will be refused");
      cors
    }
  }
}

pub async fn service_info_handler() -> JsonResponse<ServiceInfo> {
  JsonResponse(ServiceInfo {
    service: "Email Microservice".to_string(),
    version: env!("CARGO_PKG_VERSION").to_string(),
    status: "running".to_string(),
  })
}

pub async fn health_handler(State(state): State<SharedAppState>) -> JsonResponse<HealthResponse> {
  JsonResponse(HealthResponse {
    status: "ok".to_string(),
    timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    uptime: state.started_at.elapsed().as_secs_f64(),
    environment: state.config.environment.to_string(),
  })
}

pub async fn not_found_handler() -> AppError {
  AppError::not_found("Ruta no encontrada")
}
