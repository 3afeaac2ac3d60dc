//! Web server module for handling inbound webhooks.
//!
//! Routes:
//! - `/health` (any method): static liveness response
//! - everything else: signature verification of the raw body
//!
//! Each request runs on its own task and shares nothing mutable with others.

pub mod handlers;
pub mod signature;

use axum::{routing::any, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use handlers::{health, receive_webhook, verify_webhook, AppState, VerifyError};
pub use signature::{compute_signature, verify_signature, Verification, SIGNATURE_HEADER};

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let timeout = state.config.request_timeout();

    Router::new()
        .route("/health", any(health))
        .fallback(receive_webhook)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
