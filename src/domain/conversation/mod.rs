//! Conversation domain module.
//!
//! Intents, carried conversation state, subject selection and reply
//! assembly for the exemption chatbot.

mod context;
mod intent;
mod reply;
mod selection;

pub use context::{params, CarriedContext, ConversationContext};
pub use intent::{Intent, IntentError};
pub use reply::{Reply, ReplyAccumulator, DEFAULT_MAX_REPLY_CHARS};
pub use selection::SubjectSelection;
