//! HTTP handlers for the fulfillment webhook.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::application::{IntentRouter, APOLOGY};
use crate::domain::conversation::Reply;

use super::dto::{WebhookRequest, WebhookResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct WebhookState {
    router: Arc<IntentRouter>,
    /// Time allowed for routing before the apology is sent instead.
    deadline: Duration,
}

impl WebhookState {
    pub fn new(router: Arc<IntentRouter>, deadline: Duration) -> Self {
        Self { router, deadline }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /webhook - Fulfill one classified utterance
///
/// Always answers 200 once the envelope parses; failures and overruns of
/// the deadline travel inside the reply text.
pub async fn fulfill(
    State(state): State<WebhookState>,
    Json(req): Json<WebhookRequest>,
) -> Json<WebhookResponse> {
    debug!(
        response_id = req.response_id.as_deref().unwrap_or("-"),
        intent = req.intent_name(),
        "Fulfillment request received"
    );

    let ctx = req.to_context();
    let routed = tokio::time::timeout(state.deadline, state.router.route(req.intent_name(), &ctx));
    let reply = match routed.await {
        Ok(reply) => reply,
        Err(_) => {
            warn!(
                intent = req.intent_name(),
                deadline_ms = state.deadline.as_millis() as u64,
                "Intent handling overran the deadline"
            );
            Reply::text(APOLOGY)
        }
    };
    Json(WebhookResponse::from(reply))
}

/// GET /health - Process liveness, without touching the store
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
