use std::net::SocketAddr;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use mail_dispatch_api::app::create_app;
use mail_dispatch_api::config::{Config, Environment};
use mail_dispatch_api::state::SharedAppState;
use mail_dispatch_api::utils::init_email_service;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let config = Config::from_env()?;

  init_tracing(config.environment);

  let transport = init_email_service(config.smtp.clone())?;

  let probe = transport.clone();
  tokio::spawn(async move {
    if !probe.verify_connection().await {
      tracing::warn!("Could not verify the SMTP connection, starting anyway");
    }
  });

  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
  let environment = config.environment;
  let app_state = SharedAppState::new(config, transport);
  app_state.rate_limits.clone().start_cleanup_task();
  let app = create_app(app_state);

  let listener = tokio::net::TcpListener::bind(addr).await?;

  tracing::info!("Server listening on http://{}", addr);
  tracing::info!("Environment: {}", environment);
  tracing::info!("Email endpoint: POST http://{}/api/v1/emails/send", addr);

  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  Ok(())
}

fn init_tracing(environment: Environment) {
  let default_level = if environment.is_production() { "info" } else { "debug" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = signal::ctrl_c().await {
      tracing::error!("Failed to install Ctrl+C handler: {}", e);
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
      Ok(mut stream) => {
        stream.recv().await;
      }
      Err(e) => {
        tracing::error!("Failed to install signal handler: {}", e);
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
      _ = ctrl_c => {},
      _ = terminate => {},
  }

  tracing::info!("Received termination signal, shutting down gracefully...");
}
