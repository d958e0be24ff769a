//! HTTP adapters - axum application exposing the fulfillment webhook.
//!
//! Routes:
//! - `POST /webhook` - dialogue platform fulfillment
//! - `GET /health` - liveness check

pub mod middleware;
pub mod webhook;

use std::sync::Arc;
use std::time::Duration;

use axum::{http::HeaderName, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::application::IntentRouter;
use crate::config::{ServerConfig, WebhookConfig};

pub use webhook::{WebhookRequest, WebhookResponse, WebhookState};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Margin of the transport timeout over the routing deadline.
const TRANSPORT_GRACE: Duration = Duration::from_secs(1);

/// Builds the full application router with tracing and request ids.
///
/// Fulfillment routing is bounded by `server.request_timeout()`; the
/// transport timeout only catches requests stalled outside the handler.
pub fn app_router(
    router: Arc<IntentRouter>,
    server: &ServerConfig,
    webhook_config: &WebhookConfig,
) -> Router {
    let auth = webhook_config
        .auth_token
        .clone()
        .filter(|_| webhook_config.auth_token().is_some())
        .map(Arc::new);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .route("/health", get(webhook::health))
        .merge(webhook::webhook_routes(
            WebhookState::new(router, server.request_timeout()),
            auth,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(server.request_timeout() + TRANSPORT_GRACE))
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
}
