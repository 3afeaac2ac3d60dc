//! Webhook endpoint handlers.
//!
//! The webhook handler never reports the verification outcome to the caller:
//! verified and rejected requests both get an empty 200. Failures to obtain
//! the secret or read the body are fatal.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
};
use tracing::{error, info};

use crate::secrets::{fetch_webhook_secret, SecretError, SecretProvider};
use crate::web::signature::{verify_signature, Verification, SIGNATURE_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub secrets: Arc<dyn SecretProvider>,
}

impl AppState {
    pub fn new(config: Config, secrets: Arc<dyn SecretProvider>) -> Self {
        Self {
            config: Arc::new(config),
            secrets,
        }
    }
}

/// Conditions under which a request cannot be verified at all.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("failed to obtain webhook secret: {0}")]
    Secret(#[from] SecretError),

    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}

// =============================================================================
// Webhook
// =============================================================================

/// Verify one webhook request.
///
/// Fetches the secret, logs every header, reads the whole body and compares
/// the expected signature with the `X-vtypeio-Hmac-SHA256` header. A missing
/// header is logged and then fails the comparison like any wrong value.
pub async fn verify_webhook(
    secrets: &dyn SecretProvider,
    secret_id: &str,
    headers: &HeaderMap,
    body: Body,
) -> Result<Verification, VerifyError> {
    let secret = fetch_webhook_secret(secrets, secret_id).await?;

    for (name, value) in headers {
        info!(
            header_name = %name,
            header_value = %String::from_utf8_lossy(value.as_bytes()),
            "webhook_header"
        );
    }

    let received = headers
        .get(SIGNATURE_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .filter(|v| !v.is_empty());

    match &received {
        Some(signature) => info!(signature = %signature, "webhook_signature_header"),
        None => error!(header = SIGNATURE_HEADER, "webhook_signature_header_missing"),
    }

    let body = to_bytes(body, usize::MAX).await.map_err(VerifyError::Body)?;

    info!(
        body_length = body.len(),
        body = %String::from_utf8_lossy(&body),
        "webhook_body"
    );

    let outcome = verify_signature(secret.key(), &body, received.as_deref());

    match &outcome {
        Verification::Verified { expected, received } => {
            info!(
                expected = %expected,
                received = %received,
                "webhook_signature_verified"
            );
        }
        Verification::Rejected { expected, received } => {
            error!(
                expected = %expected,
                received = %received,
                "webhook_signature_mismatch"
            );
        }
    }

    Ok(outcome)
}

/// Webhook endpoint, mounted on every path except `/health`.
///
/// Always answers 200 with an empty body once verification ran, whatever the
/// outcome. On a fatal error the process exits without answering, unless
/// `exit_on_fatal` is off, in which case the request ends with a bare 500.
pub async fn receive_webhook(State(state): State<AppState>, request: Request) -> StatusCode {
    let (parts, body) = request.into_parts();

    info!(
        method = %parts.method,
        path = %parts.uri.path(),
        "webhook_received"
    );

    match verify_webhook(state.secrets.as_ref(), &state.config.secret_id, &parts.headers, body).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            error!(
                error = %e,
                secret_id = %state.config.secret_id,
                exit = state.config.exit_on_fatal,
                "webhook_fatal_error"
            );

            if state.config.exit_on_fatal {
                std::process::exit(1);
            }

            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderName;

    use super::*;
    use crate::secrets::testing::StaticProvider;
    use crate::web::signature::compute_signature;

    fn headers_with_signature(signature: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_bytes(SIGNATURE_HEADER.as_bytes()).unwrap(),
            signature.parse().unwrap(),
        );
        headers.insert("content-type", "application/json".parse().unwrap());
        headers
    }

    #[tokio::test]
    async fn test_verify_webhook_success() {
        let provider = StaticProvider::secret("s3cr3t");
        let headers = headers_with_signature(&compute_signature(b"s3cr3t", b"hello"));

        let outcome = verify_webhook(&provider, "webhooks/secret", &headers, Body::from("hello"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Verification::Verified {
                expected: "ayNlPwjHIHJVTl3++bcu/gH8/nJKlQaJ6ZHnvXCJ6z4=".to_string(),
                received: "ayNlPwjHIHJVTl3++bcu/gH8/nJKlQaJ6ZHnvXCJ6z4=".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_verify_webhook_header_name_case_insensitive() {
        let provider = StaticProvider::secret("s3cr3t");
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-vtypeio-hmac-sha256",
            compute_signature(b"s3cr3t", b"hello").parse().unwrap(),
        );

        let outcome = verify_webhook(&provider, "webhooks/secret", &headers, Body::from("hello"))
            .await
            .unwrap();

        assert!(outcome.is_verified());
    }

    #[tokio::test]
    async fn test_verify_webhook_mismatch() {
        let provider = StaticProvider::secret("s3cr3t");
        let headers = headers_with_signature("bogus");

        let outcome = verify_webhook(&provider, "webhooks/secret", &headers, Body::from("hello"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Verification::Rejected {
                expected: "ayNlPwjHIHJVTl3++bcu/gH8/nJKlQaJ6ZHnvXCJ6z4=".to_string(),
                received: "bogus".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_verify_webhook_missing_header() {
        let provider = StaticProvider::secret("s3cr3t");

        let outcome =
            verify_webhook(&provider, "webhooks/secret", &HeaderMap::new(), Body::from("hello"))
                .await
                .unwrap();

        assert!(!outcome.is_verified());
        assert_eq!(outcome.expected(), "ayNlPwjHIHJVTl3++bcu/gH8/nJKlQaJ6ZHnvXCJ6z4=");
    }

    #[tokio::test]
    async fn test_verify_webhook_secret_failure_is_fatal() {
        let provider = StaticProvider::unavailable();
        let headers = headers_with_signature("anything");

        let err = verify_webhook(&provider, "webhooks/secret", &headers, Body::from("hello"))
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::Secret(SecretError::ProviderUnavailable { .. })));
    }

    #[tokio::test]
    async fn test_verify_webhook_malformed_secret_is_fatal() {
        let provider = StaticProvider::raw("{\"webhooks_secret\": 42}");

        let err = verify_webhook(&provider, "webhooks/secret", &HeaderMap::new(), Body::empty())
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::Secret(SecretError::InvalidValue { .. })));
    }

    #[tokio::test]
    async fn test_verify_webhook_body_failure_is_fatal() {
        let provider = StaticProvider::secret("s3cr3t");
        let chunks: Vec<Result<&'static str, std::io::Error>> = vec![
            Ok("partial"),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
        ];
        let body = Body::from_stream(futures::stream::iter(chunks));

        let err = verify_webhook(&provider, "webhooks/secret", &HeaderMap::new(), body)
            .await
            .unwrap_err();

        assert!(matches!(err, VerifyError::Body(_)));
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health().await, "ok");
    }
}
