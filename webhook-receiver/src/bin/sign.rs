//! Webhook signing client.
//!
//! Reads a request body from stdin, signs it with the shared secret and
//! POSTs it to the receiver with the `X-vtypeio-Hmac-SHA256` header.
//!
//! Environment:
//! - `WEBHOOKS_SECRET`: shared secret (required)
//! - `WEBHOOK_URL`: receiver URL (default `http://localhost:9000/`)
//!
//! ```text
//! echo '{"event":"ping"}' | WEBHOOKS_SECRET=... webhook-sign
//! ```

use std::env;

use anyhow::{Context, Result};
use reqwest::Client;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use webhook_receiver::{compute_signature, SIGNATURE_HEADER};

const DEFAULT_WEBHOOK_URL: &str = "http://localhost:9000/";

#[tokio::main]
async fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    let secret = env::var("WEBHOOKS_SECRET").context("WEBHOOKS_SECRET must be set")?;
    let url = env::var("WEBHOOK_URL").unwrap_or_else(|_| DEFAULT_WEBHOOK_URL.to_string());
    let url = Url::parse(&url).with_context(|| format!("Invalid WEBHOOK_URL '{}'", url))?;

    let mut body = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut body)
        .await
        .context("Failed to read body from stdin")?;

    let signature = compute_signature(secret.as_bytes(), &body);

    info!(
        url = %url,
        body_length = body.len(),
        signature = %signature,
        "webhook_sending"
    );

    let response = Client::new()
        .post(url.clone())
        .header(SIGNATURE_HEADER, &signature)
        .body(body)
        .send()
        .await
        .with_context(|| format!("Failed to send webhook to {}", url))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .context("Failed to read response body")?;

    info!(
        status = status.as_u16(),
        response_body = %text,
        "webhook_sent"
    );

    Ok(())
}
