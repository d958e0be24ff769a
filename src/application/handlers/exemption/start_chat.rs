//! StartChatHandler - Greets the user after probing the store.

use std::sync::Arc;

use tracing::debug;

use crate::domain::conversation::Reply;
use crate::domain::exemption::Collection;
use crate::ports::DocumentStore;

use super::error::HandlerError;

pub const GREETING: &str = "Hello! Do you want to request a subject exemption or check the status of a request you already opened?";

/// Handler for the conversation opener.
///
/// The course count doubles as a liveness check: when the store is down the
/// user gets the apology instead of a greeting that leads nowhere.
pub struct StartChatHandler {
    store: Arc<dyn DocumentStore>,
}

impl StartChatHandler {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self) -> Result<Reply, HandlerError> {
        let courses = self.store.count(Collection::Courses, &[]).await?;
        debug!(courses, "Store reachable");
        Ok(Reply::text(GREETING))
    }
}
