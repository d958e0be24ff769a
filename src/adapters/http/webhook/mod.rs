//! Fulfillment webhook HTTP adapter.
//!
//! Translates the dialogue platform's envelope into a conversation context,
//! hands it to the intent router and wraps the reply segments back up.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, FulfillmentMessage, IntentRef, OriginalDetectIntentRequest, OutputContext,
    QueryResult, TextMessage, WebhookRequest, WebhookResponse,
};
pub use handlers::{fulfill, health, WebhookState};
pub use routes::webhook_routes;
