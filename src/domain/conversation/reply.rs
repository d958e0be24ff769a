//! Reply segments and the length-bounded accumulator that produces them.
//!
//! Chat front-ends cap the size of a single message, so long listings are
//! split into several segments. Splits only ever happen between pushed
//! fragments, never inside one.

use tracing::warn;

/// Maximum characters per reply segment observed on the messenger front-end.
pub const DEFAULT_MAX_REPLY_CHARS: usize = 1000;

/// Ordered reply segments for one webhook invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    segments: Vec<String>,
}

impl Reply {
    /// A reply made of a single segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            segments: vec![text.into()],
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<String> {
        self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// All segments joined, for logging and assertions.
    pub fn joined(&self) -> String {
        self.segments.concat()
    }
}

/// Accumulates reply fragments into segments of at most `max_chars`.
#[derive(Debug, Clone)]
pub struct ReplyAccumulator {
    max_chars: usize,
    buffer: String,
    buffer_chars: usize,
    segments: Vec<String>,
}

impl ReplyAccumulator {
    pub fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            buffer: String::new(),
            buffer_chars: 0,
            segments: Vec::new(),
        }
    }

    /// Starts with `header` already in the buffer.
    pub fn with_header(max_chars: usize, header: &str) -> Self {
        let mut acc = Self::new(max_chars);
        acc.push(header);
        acc
    }

    /// Appends a fragment, flushing the buffer first when the fragment would
    /// push it over the limit.
    ///
    /// A fragment that starts a new segment loses its leading newlines.
    pub fn push(&mut self, fragment: &str) {
        let fragment_chars = fragment.chars().count();
        if self.buffer_chars + fragment_chars <= self.max_chars {
            self.buffer.push_str(fragment);
            self.buffer_chars += fragment_chars;
            return;
        }

        self.flush();
        let fragment = fragment.trim_start_matches('\n');
        let fragment_chars = fragment.chars().count();
        if fragment_chars > self.max_chars {
            warn!(
                chars = fragment_chars,
                max_chars = self.max_chars,
                "Reply fragment exceeds segment limit on its own"
            );
        }
        self.buffer.push_str(fragment);
        self.buffer_chars = fragment_chars;
    }

    /// Number of completed segments so far.
    pub fn flushed_segments(&self) -> usize {
        self.segments.len()
    }

    /// Completes the reply, flushing any buffered text.
    pub fn finish(mut self) -> Reply {
        self.flush();
        Reply {
            segments: self.segments,
        }
    }

    fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.segments.push(std::mem::take(&mut self.buffer));
        }
        self.buffer_chars = 0;
    }
}

impl Default for ReplyAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REPLY_CHARS)
    }
}
