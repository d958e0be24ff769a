//! Shared-token check for fulfillment calls.
//!
//! The dialogue platform can attach static headers to every fulfillment
//! request. When a token is configured, requests must carry it in
//! `X-Webhook-Token`; anything else is rejected with 401 before the
//! envelope is parsed.
//!
//! ```text
//! Request → webhook_auth → token matches? → fulfill
//!                        ↘ 401 {"code":"UNAUTHORIZED", ...}
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use tracing::warn;

use crate::adapters::http::webhook::ErrorResponse;

/// Header carrying the shared token.
pub const WEBHOOK_TOKEN_HEADER: &str = "x-webhook-token";

/// Middleware state - the expected token.
pub type WebhookAuthState = Arc<SecretString>;

pub async fn webhook_auth(
    State(expected): State<WebhookAuthState>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get(WEBHOOK_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(token) if tokens_match(token, expected.expose_secret()) => next.run(request).await,
        Some(_) => {
            warn!("Rejected fulfillment call with a wrong webhook token");
            unauthorized("Invalid webhook token")
        }
        None => {
            warn!("Rejected fulfillment call without a webhook token");
            unauthorized("Missing webhook token")
        }
    }
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse::unauthorized(message)),
    )
        .into_response()
}

/// Constant-time comparison; only the length leaks.
fn tokens_match(provided: &str, expected: &str) -> bool {
    if provided.len() != expected.len() {
        return false;
    }
    provided.as_bytes().ct_eq(expected.as_bytes()).into()
}
