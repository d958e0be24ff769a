//! Exemption intent handlers.
//!
//! One handler per platform intent, plus the catalogue queries and reply
//! settings they share.

// Query handlers
mod get_request_status;
mod start_chat;

// Command handlers
mod new_request;
mod receive_file;
mod seed_database;
mod select_subjects;

mod catalog;
mod deferred;
mod error;
mod settings;

#[cfg(test)]
pub(crate) mod fixtures;

pub use deferred::DeferredWriter;
pub use error::HandlerError;
pub use get_request_status::{
    GetRequestStatusHandler, GetRequestStatusQuery, ASK_REGISTRATION_FOR_STATUS,
};
pub use new_request::{NewRequestCommand, NewRequestHandler, ASK_REGISTRATION_FOR_NEW_REQUEST};
pub use receive_file::{ReceiveFileCommand, ReceiveFileHandler, ReceiveFileResult};
pub use seed_database::{SeedDatabaseHandler, SeedDatabaseResult, DATABASE_RESTORED};
pub use select_subjects::{SelectSubjectsCommand, SelectSubjectsHandler, NO_VALID_SUBJECT};
pub use settings::{ReplySettings, DEFAULT_SUPPORT_CONTACT};
pub use start_chat::{StartChatHandler, GREETING};
