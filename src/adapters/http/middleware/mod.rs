//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `webhook_auth` - Shared-token check on fulfillment calls

pub mod webhook_auth;

pub use webhook_auth::{webhook_auth, WebhookAuthState, WEBHOOK_TOKEN_HEADER};
