//! Webhook receiver - HMAC-SHA256 signature verification for inbound webhooks.
//!
//! This library backs two binaries:
//! - `webhook-receiver`: HTTP server verifying signed webhook bodies
//! - `webhook-sign`: client that signs a body and sends it to the receiver
//!
//! ## Request Flow
//!
//! ```text
//! Request → fetch secret (per request) → read body → HMAC-SHA256 → base64 → compare header
//! ```

pub mod config;
pub mod secrets;
pub mod web;

// Re-export commonly used types
pub use config::{Config, SecretProviderKind};
pub use secrets::{build_provider, fetch_webhook_secret, SecretError, SecretProvider, WebhookSecret};
pub use web::{compute_signature, router, AppState, Verification, SIGNATURE_HEADER};
