//! HTTP routes for the fulfillment webhook.

use axum::{middleware, routing::post, Router};

use crate::adapters::http::middleware::{webhook_auth, WebhookAuthState};

use super::handlers::{fulfill, WebhookState};

/// Creates the webhook router, token-protected when a token is configured.
pub fn webhook_routes(state: WebhookState, auth: Option<WebhookAuthState>) -> Router {
    let router = Router::new()
        .route("/webhook", post(fulfill))
        .with_state(state);

    match auth {
        Some(auth) => router.layer(middleware::from_fn_with_state(auth, webhook_auth)),
        None => router,
    }
}
