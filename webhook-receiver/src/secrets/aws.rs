//! AWS Secrets Manager secret provider.
//!
//! The SDK client is built once at startup. Credentials come from the
//! default AWS chain (env, profile, instance/task role) and are resolved
//! lazily, so an auth failure surfaces on the first `get_secret` call.

use async_trait::async_trait;
use aws_config::BehaviorVersion;

use super::{SecretError, SecretProvider};

/// Secret provider that reads from AWS Secrets Manager.
#[derive(Debug)]
pub struct AwsSecretsManagerProvider {
    client: aws_sdk_secretsmanager::Client,
    region: String,
}

impl AwsSecretsManagerProvider {
    /// Create a provider pinned to `region`.
    pub async fn new(region: &str) -> Result<Self, SecretError> {
        if region.trim().is_empty() {
            return Err(SecretError::ConfigError {
                detail: "AWS region is required".to_string(),
            });
        }

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;
        let client = aws_sdk_secretsmanager::Client::new(&sdk_config);

        tracing::info!(region = %region, "aws_secrets_manager_initialized");

        Ok(Self::from_client(client, region))
    }

    /// Wrap an already configured client.
    pub fn from_client(client: aws_sdk_secretsmanager::Client, region: &str) -> Self {
        Self {
            client,
            region: region.to_string(),
        }
    }
}

#[async_trait]
impl SecretProvider for AwsSecretsManagerProvider {
    async fn get_secret(&self, id: &str) -> Result<String, SecretError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(id)
            .send()
            .await
            .map_err(|e| SecretError::ProviderUnavailable {
                provider: "aws".to_string(),
                detail: format!(
                    "Failed to get secret '{}' (region: {}): {}",
                    id,
                    self.region,
                    aws_sdk_secretsmanager::error::DisplayErrorContext(&e)
                ),
            })?;

        let value = output
            .secret_string()
            .ok_or_else(|| SecretError::InvalidValue {
                id: id.to_string(),
                detail: "AWS secret has no SecretString".to_string(),
            })?;

        tracing::info!(
            secret_id = %id,
            version = ?output.version_id(),
            "secret_loaded_from_aws"
        );

        Ok(value.to_string())
    }

    fn provider_type(&self) -> &'static str {
        "aws"
    }
}
