use std::{sync::Arc, time::Instant};

use crate::{
  config::Config,
  domains::email::{
    model::SendEmailRequest,
    service::{EmailService, EmailServiceImpl, SendEmailError},
  },
  email::MailTransport,
  middleware::rate_limit::RateLimitState,
};

pub trait AppState: Clone + Send + Sync + 'static {
  fn send_email(
    &self,
    req: SendEmailRequest,
  ) -> impl std::future::Future<Output = Result<String, SendEmailError>> + Send;
}

#[derive(Clone)]
pub struct SharedAppState {
  pub email_service: Arc<EmailServiceImpl>,
  pub config: Arc<Config>,
  pub rate_limits: RateLimitState,
  pub started_at: Instant,
}

impl SharedAppState {
  pub fn new(config: Config, transport: Arc<dyn MailTransport>) -> Self {
    Self::with_rate_limits(config, transport, RateLimitState::default())
  }

  pub fn with_rate_limits(config: Config, transport: Arc<dyn MailTransport>, rate_limits: RateLimitState) -> Self {
    let email_service = Arc::new(EmailServiceImpl::new(transport, config.frontend_url.clone()));

    Self {
      email_service,
      config: Arc::new(config),
      rate_limits,
      started_at: Instant::now(),
    }
  }
}

impl AppState for SharedAppState {
  async fn send_email(&self, req: SendEmailRequest) -> Result<String, SendEmailError> {
    self.email_service.send_email(req).await
  }
}
