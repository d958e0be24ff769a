//! IntentRouter - Dispatches a classified intent to its handler.
//!
//! The router is the failure boundary of a webhook call: whatever goes
//! wrong inside a handler reaches the user as a reply, never as an HTTP
//! error, because the platform drops late or failed fulfillments silently.

use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::domain::conversation::{ConversationContext, Intent, Reply};
use crate::ports::DocumentStore;

use super::handlers::exemption::{
    DeferredWriter, GetRequestStatusHandler, GetRequestStatusQuery, HandlerError,
    NewRequestCommand, NewRequestHandler, ReceiveFileCommand, ReceiveFileHandler, ReplySettings,
    SeedDatabaseHandler, SelectSubjectsCommand, SelectSubjectsHandler, StartChatHandler,
};

pub const UNSUPPORTED_INTENT: &str = "Sorry, I can't handle that request yet.";

pub const APOLOGY: &str =
    "Sorry, something went wrong while handling your request. Please try again in a moment.";

/// Routes platform intents to the exemption handlers.
pub struct IntentRouter {
    settings: ReplySettings,
    start_chat: StartChatHandler,
    get_request_status: GetRequestStatusHandler,
    new_request: NewRequestHandler,
    select_subjects: SelectSubjectsHandler,
    receive_file: ReceiveFileHandler,
    seed_database: SeedDatabaseHandler,
}

impl IntentRouter {
    pub fn new(store: Arc<dyn DocumentStore>, settings: ReplySettings) -> Self {
        Self {
            start_chat: StartChatHandler::new(Arc::clone(&store)),
            get_request_status: GetRequestStatusHandler::new(Arc::clone(&store)),
            new_request: NewRequestHandler::new(Arc::clone(&store), settings.clone()),
            select_subjects: SelectSubjectsHandler::new(Arc::clone(&store), settings.clone()),
            receive_file: ReceiveFileHandler::new(
                Arc::clone(&store),
                DeferredWriter::new(Arc::clone(&store)),
            ),
            seed_database: SeedDatabaseHandler::new(store),
            settings,
        }
    }

    /// Resolves a platform intent name and dispatches it.
    pub async fn route(&self, intent_name: &str, ctx: &ConversationContext) -> Reply {
        match intent_name.parse::<Intent>() {
            Ok(intent) => self.dispatch(intent, ctx).await,
            Err(e) => {
                error!(intent = intent_name, error = %e, "Dialogue agent sent an unknown intent");
                Reply::text(UNSUPPORTED_INTENT)
            }
        }
    }

    /// Runs the handler for `intent`, turning failures into a reply.
    pub async fn dispatch(&self, intent: Intent, ctx: &ConversationContext) -> Reply {
        let span = info_span!(
            "intent",
            intent = %intent,
            session = ctx.session().unwrap_or("-")
        );

        async move {
            info!("Dispatching intent");
            match self.resolve(intent, ctx).await {
                Ok(reply) => {
                    debug!(segments = reply.segments().len(), reply = %reply.joined(), "Reply ready");
                    reply
                }
                Err(e) => {
                    warn!(code = %e.code(), error = %e, "Intent handler failed");
                    self.failure_reply(&e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn resolve(&self, intent: Intent, ctx: &ConversationContext) -> Result<Reply, HandlerError> {
        match intent {
            Intent::StartChat => self.start_chat.handle().await,
            Intent::GetRequestStatus => {
                self.get_request_status
                    .handle(GetRequestStatusQuery::from_context(ctx))
                    .await
            }
            Intent::NewRequest => {
                self.new_request
                    .handle(NewRequestCommand::from_context(ctx))
                    .await
            }
            Intent::SelectSubjects => {
                self.select_subjects
                    .handle(SelectSubjectsCommand::from_context(ctx))
                    .await
            }
            Intent::ReceiveFile => {
                let cmd = ReceiveFileCommand::from_context(ctx)?;
                Ok(self.receive_file.handle(cmd).await?.reply)
            }
            Intent::SeedDatabase => Ok(self.seed_database.handle().await?.reply),
        }
    }

    fn failure_reply(&self, err: &HandlerError) -> Reply {
        match err {
            HandlerError::MissingContext { field } => Reply::text(format!(
                "Parameter \"{}\" not found. Contact {}.",
                field, self.settings.support_contact
            )),
            HandlerError::Store(_) => Reply::text(APOLOGY),
        }
    }
}
