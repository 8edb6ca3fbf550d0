use std::{fmt, str::FromStr};

use lettre::Address;

use crate::email::{SmtpConfig, DEFAULT_FROM_NAME};

const MIN_API_KEY_LEN: usize = 32;
const MIN_SMTP_PASSWORD_LEN: usize = 16;
const DEFAULT_TRUST_PROXY_HOPS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
  Development,
  Production,
  Test,
}

impl Environment {
  pub fn as_str(&self) -> &'static str {
    match self {
      Environment::Development => "development",
      Environment::Production => "production",
      Environment::Test => "test",
    }
  }

  pub fn is_development(&self) -> bool {
    matches!(self, Environment::Development)
  }

  pub fn is_production(&self) -> bool {
    matches!(self, Environment::Production)
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Environment {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "development" => Ok(Environment::Development),
      "production" => Ok(Environment::Production),
      "test" => Ok(Environment::Test),
      other => Err(format!(
        "APP_ENV must be one of development, production, test (got \"{}\")",
        other
      )),
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("invalid environment configuration:\n  - {}", .0.join("\n  - "))]
  Invalid(Vec<String>),
}

/// Process configuration, loaded once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
  pub port: u16,
  pub environment: Environment,
  pub api_key: String,
  pub frontend_url: String,
  /// Reverse proxies in front of the service that append to `X-Forwarded-For`.
  /// Zero keys clients by the socket peer address alone.
  pub trust_proxy_hops: usize,
  pub smtp: SmtpConfig,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Builds the configuration from an arbitrary variable source, reporting every problem at once.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let mut issues = Vec::new();

    let port = parse_port(&lookup, "PORT", 3000, &mut issues);
    let environment = match lookup("APP_ENV") {
      Some(value) => value.parse().unwrap_or_else(|e| {
        issues.push(e);
        Environment::Development
      }),
      None => Environment::Development,
    };

    let api_key = required(&lookup, "API_KEY", &mut issues);
    if !api_key.is_empty() && api_key.chars().count() < MIN_API_KEY_LEN {
      issues.push(format!("API_KEY must be at least {} characters", MIN_API_KEY_LEN));
    }

    let frontend_url = required(&lookup, "FRONTEND_URL", &mut issues);
    if !frontend_url.is_empty() && url::Url::parse(&frontend_url).is_err() {
      issues.push("FRONTEND_URL must be a valid URL".to_string());
    }

    let trust_proxy_hops = match lookup("TRUST_PROXY_HOPS") {
      Some(value) => value.parse().unwrap_or_else(|_| {
        issues.push("TRUST_PROXY_HOPS must be a non-negative integer".to_string());
        DEFAULT_TRUST_PROXY_HOPS
      }),
      None => DEFAULT_TRUST_PROXY_HOPS,
    };

    let username = required(&lookup, "SMTP_USERNAME", &mut issues);
    if !username.is_empty() && username.parse::<Address>().is_err() {
      issues.push("SMTP_USERNAME must be a valid email address".to_string());
    }

    let password = required(&lookup, "SMTP_PASSWORD", &mut issues);
    if !password.is_empty() && password.chars().count() < MIN_SMTP_PASSWORD_LEN {
      issues.push(format!(
        "SMTP_PASSWORD must be at least {} characters",
        MIN_SMTP_PASSWORD_LEN
      ));
    }

    let from_email = lookup("SMTP_FROM_EMAIL").unwrap_or_else(|| username.clone());
    if !from_email.is_empty() && from_email.parse::<Address>().is_err() {
      issues.push("SMTP_FROM_EMAIL must be a valid email address".to_string());
    }

    let defaults = SmtpConfig::default();
    let smtp = SmtpConfig {
      host: lookup("SMTP_HOST").unwrap_or(defaults.host),
      port: parse_port(&lookup, "SMTP_PORT", defaults.port, &mut issues),
      username,
      password,
      from_email,
      from_name: lookup("SMTP_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
    };

    if !issues.is_empty() {
      return Err(ConfigError::Invalid(issues));
    }

    Ok(Config {
      port,
      environment,
      api_key,
      frontend_url,
      trust_proxy_hops,
      smtp,
    })
  }
}

fn required<F>(lookup: &F, key: &str, issues: &mut Vec<String>) -> String
where
  F: Fn(&str) -> Option<String>,
{
  match lookup(key) {
    Some(value) if !value.is_empty() => value,
    _ => {
      issues.push(format!("{} must be set", key));
      String::new()
    }
  }
}

fn parse_port<F>(lookup: &F, key: &str, default: u16, issues: &mut Vec<String>) -> u16
where
  F: Fn(&str) -> Option<String>,
{
  match lookup(key) {
    Some(value) => value.parse().unwrap_or_else(|_| {
      issues.push(format!("{} must be a valid port number", key));
      default
    }),
    None => default,
  }
}
