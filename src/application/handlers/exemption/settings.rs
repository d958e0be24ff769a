//! Reply settings shared by every handler.

use crate::domain::conversation::{ReplyAccumulator, DEFAULT_MAX_REPLY_CHARS};

/// Who users are told to contact when the conversation cannot continue.
pub const DEFAULT_SUPPORT_CONTACT: &str = "the registrar's office (DERAC)";

/// Segment size limit and operator contact used when phrasing replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplySettings {
    pub max_reply_chars: usize,
    pub support_contact: String,
}

impl ReplySettings {
    pub fn new(max_reply_chars: usize, support_contact: impl Into<String>) -> Self {
        Self {
            max_reply_chars,
            support_contact: support_contact.into(),
        }
    }

    /// Accumulator pre-loaded with a header line.
    pub fn accumulator(&self, header: &str) -> ReplyAccumulator {
        ReplyAccumulator::with_header(self.max_reply_chars, header)
    }
}

impl Default for ReplySettings {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REPLY_CHARS, DEFAULT_SUPPORT_CONTACT)
    }
}
