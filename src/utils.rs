use std::{net::SocketAddr, sync::Arc};

use axum::{
  extract::{ConnectInfo, Request},
  http::HeaderMap,
};
use sha2::{Digest, Sha256};

use crate::email::{MailError, MailTransport, SmtpConfig, SmtpMailer};

pub mod error;

pub fn sha256_digest(value: &[u8]) -> [u8; 32] {
  let mut hasher = Sha256::new();
  hasher.update(value);
  hasher.finalize().into()
}

/// Compares two secrets through their digests so the comparison does not
/// depend on the configured key's length or on a shared prefix.
pub fn secrets_match(provided: &[u8], expected: &[u8]) -> bool {
  let provided = sha256_digest(provided);
  let expected = sha256_digest(expected);
  provided
    .iter()
    .zip(expected.iter())
    .fold(0u8, |acc, (a, b)| acc | (a ^ b))
    == 0
}

/// Client identity used for rate limiting. With `trusted_hops` proxies in
/// front, the address appended by the outermost trusted proxy is used, so
/// hops supplied by the client are ignored. Without a proxy, or without an
/// `X-Forwarded-For` header, the peer address is used.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trusted_hops: usize) -> String {
  if trusted_hops > 0 {
    let hops: Vec<&str> = headers
      .get_all("x-forwarded-for")
      .iter()
      .filter_map(|v| v.to_str().ok())
      .flat_map(|v| v.split(','))
      .map(str::trim)
      .filter(|hop| !hop.is_empty())
      .collect();

    if !hops.is_empty() {
      return hops[hops.len().saturating_sub(trusted_hops)].to_string();
    }
  }

  peer
    .map(|addr| addr.ip().to_string())
    .unwrap_or_else(|| "unknown".to_string())
}

pub fn request_client_ip(req: &Request, trusted_hops: usize) -> String {
  let peer = req
    .extensions()
    .get::<ConnectInfo<SocketAddr>>()
    .map(|ConnectInfo(addr)| *addr);
  client_ip(req.headers(), peer, trusted_hops)
}

pub fn init_email_service(smtp_config: SmtpConfig) -> Result<Arc<dyn MailTransport>, MailError> {
  let mailer = SmtpMailer::new(smtp_config)?;
  Ok(Arc::new(mailer))
}
