//! Secret store access.
//!
//! The webhook secret is fetched fresh on every request through a
//! `SecretProvider`. Nothing is cached.
//!
//! ## Secret format
//!
//! ```text
//! {"webhooks_secret": "<shared secret>"}
//! ```

pub mod aws;
pub mod env;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::config::{Config, SecretProviderKind};

pub use aws::AwsSecretsManagerProvider;
pub use env::EnvSecretProvider;

/// Errors returned by secret provider operations.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    /// Secret not found in provider.
    #[error("Secret not found: '{id}'")]
    NotFound { id: String },

    /// Provider is unreachable (network error, auth failure).
    #[error("Secret provider '{provider}' unavailable: {detail}")]
    ProviderUnavailable { provider: String, detail: String },

    /// Secret value is malformed (not JSON, missing field, no string payload).
    #[error("Invalid secret value for '{id}': {detail}")]
    InvalidValue { id: String, detail: String },

    /// Provider could not be configured.
    #[error("Secret provider configuration error: {detail}")]
    ConfigError { detail: String },
}

/// Pluggable secret retrieval capability.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the raw secret string stored under `id`.
    async fn get_secret(&self, id: &str) -> Result<String, SecretError>;

    /// Short name of the backend, for logs.
    fn provider_type(&self) -> &'static str;
}

/// The decoded webhook secret document.
#[derive(Clone, Deserialize)]
pub struct WebhookSecret {
    pub webhooks_secret: String,
}

impl fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookSecret")
            .field("webhooks_secret", &"[REDACTED]")
            .finish()
    }
}

impl WebhookSecret {
    /// Key bytes used for HMAC computation.
    pub fn key(&self) -> &[u8] {
        self.webhooks_secret.as_bytes()
    }
}

/// Fetch the secret stored under `id` and decode it as a `WebhookSecret`.
pub async fn fetch_webhook_secret(
    provider: &dyn SecretProvider,
    id: &str,
) -> Result<WebhookSecret, SecretError> {
    let raw = provider.get_secret(id).await?;

    let secret: WebhookSecret =
        serde_json::from_str(&raw).map_err(|e| SecretError::InvalidValue {
            id: id.to_string(),
            detail: e.to_string(),
        })?;

    info!(
        secret_id = %id,
        provider = provider.provider_type(),
        "webhook_secret_fetched"
    );

    Ok(secret)
}

/// Build the provider selected by configuration.
pub async fn build_provider(config: &Config) -> Result<Arc<dyn SecretProvider>, SecretError> {
    let provider: Arc<dyn SecretProvider> = match config.secret_provider {
        SecretProviderKind::Aws => Arc::new(AwsSecretsManagerProvider::new(&config.region).await?),
        SecretProviderKind::Env => Arc::new(EnvSecretProvider::new(config.secret_env_var.clone())),
    };

    info!(provider = provider.provider_type(), "secret_provider_ready");

    Ok(provider)
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Provider returning a fixed result, for tests.
    pub struct StaticProvider(pub Result<String, String>);

    impl StaticProvider {
        pub fn secret(secret: &str) -> Self {
            StaticProvider(Ok(serde_json::json!({ "webhooks_secret": secret }).to_string()))
        }

        pub fn raw(raw: &str) -> Self {
            StaticProvider(Ok(raw.to_string()))
        }

        pub fn unavailable() -> Self {
            StaticProvider(Err("connection refused".to_string()))
        }
    }

    #[async_trait]
    impl SecretProvider for StaticProvider {
        async fn get_secret(&self, _id: &str) -> Result<String, SecretError> {
            self.0.clone().map_err(|detail| SecretError::ProviderUnavailable {
                provider: "static".to_string(),
                detail,
            })
        }

        fn provider_type(&self) -> &'static str {
            "static"
        }
    }
}
