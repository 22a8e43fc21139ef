//! Transcript artifacts.
//!
//! Every invocation produces two ordered text artifacts: a narrative log of
//! the URLs visited (with redirect separators, status, and content) and a raw
//! log holding the final response content only. Both are built from the same
//! response record and written to the invocation's log sink under the
//! [`LOG_STREAM`](crate::config::LOG_STREAM) and
//! [`CONTENT_STREAM`](crate::config::CONTENT_STREAM) names.

use std::collections::BTreeMap;

use crate::fetch::ResponseRecord;

/// Width of the separator drawn after each redirect hop.
const SEPARATOR_WIDTH: usize = 60;

/// Destination for a step's named transcript streams.
///
/// Each stream is write-once, append-only within an invocation.
pub trait LogSink: Send {
    /// Appends text to the named stream.
    fn append(&mut self, stream: &str, text: &str);
}

/// In-memory log sink.
#[derive(Debug, Clone, Default)]
pub struct MemoryLogSink {
    streams: BTreeMap<String, String>,
}

impl MemoryLogSink {
    /// Creates a sink with no streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of the named stream, if anything was written to it.
    pub fn stream(&self, name: &str) -> Option<&str> {
        self.streams.get(name).map(String::as_str)
    }
}

impl LogSink for MemoryLogSink {
    fn append(&mut self, stream: &str, text: &str) {
        self.streams
            .entry(stream.to_string())
            .or_default()
            .push_str(text);
    }
}

/// Raw content of the final response.
pub fn content_log(record: &ResponseRecord) -> String {
    record.body_text().into_owned()
}

/// Narrative of the redirect chain and the final response.
///
/// Each redirect hop gets its own block with a 1-based hop count, the hop
/// URL, and the hop content, closed by a separator line; the final block
/// carries the final URL, status, and content.
pub fn narrative_log(record: &ResponseRecord) -> String {
    let mut out = String::new();
    for (hop, snapshot) in record.history.iter().enumerate() {
        out.push_str(&format!("Redirected {} times:\n\n", hop + 1));
        out.push_str(&format!("URL: {}\n", snapshot.url));
        out.push_str(" ------ Content ------\n");
        out.push_str(&snapshot.body_text());
        out.push('\n');
        out.push_str(&"=".repeat(SEPARATOR_WIDTH));
        out.push('\n');
    }
    out.push_str(&format!("URL: {}\n", record.url));
    out.push_str(&format!("Status: {}\n", record.status));
    out.push_str(" ------ Content ------\n");
    out.push_str(&record.body_text());
    out
}
