//! Application layer - Intent routing and handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Read-only intents are query handlers; intents that write are command
//! handlers.

pub mod handlers;
mod router;

pub use handlers::exemption::{HandlerError, ReplySettings};
pub use router::{IntentRouter, APOLOGY, UNSUPPORTED_INTENT};
