//! Environment variable secret provider.
//!
//! Holds the whole secret JSON document in one variable, read on every call
//! so that changes are picked up the same way a remote store would be.

use async_trait::async_trait;
use tracing::debug;

use super::{SecretError, SecretProvider};

/// Secret provider that reads the secret document from an environment variable.
#[derive(Debug)]
pub struct EnvSecretProvider {
    env_var: String,
}

impl EnvSecretProvider {
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
    async fn get_secret(&self, id: &str) -> Result<String, SecretError> {
        match std::env::var(&self.env_var) {
            Ok(value) if !value.trim().is_empty() => {
                debug!(secret_id = %id, env_var = %self.env_var, "secret_loaded_from_env");
                Ok(value)
            }
            _ => Err(SecretError::NotFound { id: id.to_string() }),
        }
    }

    fn provider_type(&self) -> &'static str {
        "env"
    }
}
