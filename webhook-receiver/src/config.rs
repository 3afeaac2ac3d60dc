//! Configuration module for environment variable parsing.
//!
//! Everything the handlers need (region, secret id, port) is read once at
//! startup and injected through `AppState`.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Which backend the receiver fetches the webhook secret from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretProviderKind {
    /// AWS Secrets Manager
    Aws,
    /// A raw secret JSON document held in an environment variable
    Env,
}

impl FromStr for SecretProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aws" => Ok(SecretProviderKind::Aws),
            "env" => Ok(SecretProviderKind::Env),
            other => Err(format!("unknown secret provider '{}'", other)),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Region the secret store lives in
    pub region: String,

    /// Logical id of the webhook secret in the store
    pub secret_id: String,

    /// Port for the web server to listen on (all interfaces)
    pub port: u16,

    /// Secret backend selection
    pub secret_provider: SecretProviderKind,

    /// Environment variable holding the secret JSON when `secret_provider` is `Env`
    pub secret_env_var: String,

    /// Deadline for a whole request/response cycle, in seconds
    pub request_timeout_secs: u64,

    /// Terminate the process on secret or body read failures
    pub exit_on_fatal: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            region: "us-east-1".to_string(),
            secret_id: "webhooks/secret".to_string(),
            port: 9000,
            secret_provider: SecretProviderKind::Aws,
            secret_env_var: "WEBHOOKS_SECRET_JSON".to_string(),
            request_timeout_secs: 10,
            exit_on_fatal: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Config {
            region: env::var("AWS_REGION")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.region),

            secret_id: env::var("WEBHOOKS_SECRET_ID")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.secret_id),

            port: parse_var("PORT", defaults.port),

            secret_provider: parse_var("SECRET_PROVIDER", defaults.secret_provider),

            secret_env_var: env::var("WEBHOOKS_SECRET_ENV")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.secret_env_var),

            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),

            exit_on_fatal: parse_var("EXIT_ON_FATAL", defaults.exit_on_fatal),
        }
    }

    /// Request deadline as a `Duration`.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parse an environment variable, falling back to `default` when it is
/// unset or unparsable.
fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}
