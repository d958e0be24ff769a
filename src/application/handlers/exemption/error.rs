//! Failures a handler reports to the intent router.

use thiserror::Error;
use tracing::debug;

use crate::domain::foundation::{ErrorCode, ValidationError};
use crate::ports::StoreError;

/// Error type shared by the exemption intent handlers.
///
/// Missing user input is not an error: handlers answer it with a prompt.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// A value that an earlier turn should have carried over is absent.
    #[error("Carried parameter '{field}' is missing")]
    MissingContext { field: &'static str },

    /// A document store round trip failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl HandlerError {
    pub fn missing(field: &'static str) -> Self {
        HandlerError::MissingContext { field }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            HandlerError::MissingContext { .. } => ErrorCode::MissingContext,
            HandlerError::Store(_) => ErrorCode::DatabaseError,
        }
    }
}

/// Parses a typed value, treating a rejected one like no value at all.
///
/// The rejection is logged so an unusable id is told apart from a missing one.
pub(crate) fn accept<T>(
    param: &'static str,
    raw: Option<String>,
    parse: impl FnOnce(&str) -> Result<T, ValidationError>,
) -> Option<T> {
    let raw = raw?;
    match parse(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(param, value = %raw, code = %e.code(), error = %e, "Ignoring unusable parameter value");
            None
        }
    }
}
