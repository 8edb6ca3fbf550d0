//! Per-client sliding-window rate limiting.

use std::{collections::VecDeque, sync::Arc, time::Duration};

use axum::{
  extract::{Request, State},
  middleware::Next,
  response::Response,
};
use dashmap::DashMap;
use tokio::time::Instant;

use crate::{state::SharedAppState, utils::request_client_ip, AppError};

/// Sends allowed per client per minute on `POST /emails/send`.
pub const SEND_REQUESTS_PER_MINUTE: usize = 10;
pub const SEND_WINDOW: Duration = Duration::from_secs(60);
/// Requests allowed per client per 15 minutes on any route.
pub const GLOBAL_REQUESTS_PER_WINDOW: usize = 100;
pub const GLOBAL_WINDOW: Duration = Duration::from_secs(15 * 60);

const CLEANUP_INTERVAL: Duration = Duration::from_secs(300);

/// Admits at most `limit` requests per key in any span of `window`.
#[derive(Debug)]
pub struct SlidingWindow {
  limit: usize,
  window: Duration,
  hits: DashMap<String, VecDeque<Instant>>,
}

impl SlidingWindow {
  pub fn new(limit: usize, window: Duration) -> Self {
    Self {
      limit,
      window,
      hits: DashMap::new(),
    }
  }

  /// Records the request and returns whether it is within the limit.
  /// Rejected requests are not recorded.
  pub fn check(&self, key: &str) -> bool {
    let now = Instant::now();
    let mut hits = self.hits.entry(key.to_string()).or_default();

    while let Some(oldest) = hits.front() {
      if now.duration_since(*oldest) >= self.window {
        hits.pop_front();
      } else {
        break;
      }
    }

    if hits.len() >= self.limit {
      return false;
    }
    hits.push_back(now);
    true
  }

  /// Drops keys with no request inside the current window.
  pub fn retain_recent(&self) {
    let now = Instant::now();
    self
      .hits
      .retain(|_, hits| hits.back().is_some_and(|last| now.duration_since(*last) < self.window));
  }

  pub fn len(&self) -> usize {
    self.hits.len()
  }

  pub fn is_empty(&self) -> bool {
    self.hits.is_empty()
  }
}

#[derive(Clone)]
pub struct RateLimitState {
  global: Arc<SlidingWindow>,
  send: Arc<SlidingWindow>,
}

impl Default for RateLimitState {
  fn default() -> Self {
    Self::new(
      SlidingWindow::new(GLOBAL_REQUESTS_PER_WINDOW, GLOBAL_WINDOW),
      SlidingWindow::new(SEND_REQUESTS_PER_MINUTE, SEND_WINDOW),
    )
  }
}

impl RateLimitState {
  pub fn new(global: SlidingWindow, send: SlidingWindow) -> Self {
    Self {
      global: Arc::new(global),
      send: Arc::new(send),
    }
  }

  pub fn check_global(&self, client: &str) -> bool {
    self.global.check(client)
  }

  pub fn check_send(&self, client: &str) -> bool {
    self.send.check(client)
  }

  pub fn cleanup(&self) {
    self.global.retain_recent();
    self.send.retain_recent();
  }

  pub fn start_cleanup_task(self) {
    tokio::spawn(async move {
      loop {
        tokio::time::sleep(CLEANUP_INTERVAL).await;
        self.cleanup();
      }
    });
  }
}

pub async fn global_rate_limit(State(state): State<SharedAppState>, req: Request, next: Next) -> Result<Response, AppError> {
  let ip = request_client_ip(&req, state.config.trust_proxy_hops);

  if !state.rate_limits.check_global(&ip) {
    tracing::warn!(ip = %ip, "Rate limit exceeded");
    return Err(AppError::too_many_requests(
      "Demasiadas solicitudes. Por favor, intente de nuevo más tarde.",
    ));
  }

  Ok(next.run(req).await)
}

pub async fn send_rate_limit(State(state): State<SharedAppState>, req: Request, next: Next) -> Result<Response, AppError> {
  let ip = request_client_ip(&req, state.config.trust_proxy_hops);

  if !state.rate_limits.check_send(&ip) {
    tracing::warn!(ip = %ip, "Send rate limit exceeded");
    return Err(AppError::too_many_requests(
      "Límite de envíos excedido. Por favor, espere un momento.",
    ));
  }

  Ok(next.run(req).await)
}
