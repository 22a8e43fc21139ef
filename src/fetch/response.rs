//! Response records.

use std::borrow::Cow;

/// One intermediate response captured while following redirects.
#[derive(Debug, Clone)]
pub struct ResponseSnapshot {
    /// URL this response was served from.
    pub url: String,
    /// HTTP status code.
    pub status: u16,
    /// Raw response content.
    pub body: Vec<u8>,
}

impl ResponseSnapshot {
    /// Response content as text, lossy for non-UTF-8 bytes.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// The final result of a step's HTTP request.
///
/// Scoped to a single invocation and discarded when the step completes.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    /// Final response URL, after any redirects.
    pub url: String,
    /// Final HTTP status code.
    pub status: u16,
    /// Raw content of the final response.
    pub body: Vec<u8>,
    /// Redirect chain in chronological order, first hop first. The final
    /// response is not part of the history; it is this record itself.
    pub history: Vec<ResponseSnapshot>,
}

impl ResponseRecord {
    /// Final response content as text, lossy for non-UTF-8 bytes.
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}
