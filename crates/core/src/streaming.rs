//! Stream Event Protocol
//!
//! Typed events for the newline-delimited stream between the gateway and a
//! chat client, plus the producer-side encoder and the consumer-side
//! decoder:
//!
//! - `StreamEvent` - tagged union describing incremental progress of a turn
//! - `StreamEncoder` - one self-contained JSON record per event, newline
//!   terminated; write order is the delivery-order contract
//! - `StreamDecoder` - reassembles complete records from arbitrarily
//!   chunked transport reads
//!
//! `Content.text` is *cumulative*: each snapshot carries the full message
//! so far and supersedes (not extends) the previous one. Downstream
//! renderers depend on this framing; do not convert it to deltas.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, CoreResult};
use crate::task::ExecutionResult;

/// One record in the ordered, typed event stream.
///
/// Ordering rules: `metadata`, when present, is first; exactly one `done`
/// (or stream closure) terminates the stream; consumers must preserve
/// arrival order and must not treat a `content` event as final until
/// `done` arrives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Stream preamble: message identity and the requested model
    Metadata {
        message_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model: Option<String>,
    },

    /// Cumulative message text (the full message so far, not a delta)
    Content {
        text: String,
        /// Model that actually produced the text, when it differs from
        /// (or confirms) the requested one.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        model_used: Option<String>,
    },

    /// Model reasoning surfaced mid-turn
    Thinking { text: String },

    /// Human-readable progress notice ("Connecting to ...")
    Status { text: String },

    /// An MCP-backed action is about to run
    McpAction { service: String, action: String },

    /// Outcome of an MCP-backed action
    McpResult {
        service: String,
        action: String,
        result: ExecutionResult,
    },

    /// Recoverable stream-level error, actionable by the user
    Error { text: String },

    /// Terminal marker; nothing follows
    Done,
}

/// Serializes stream events as newline-delimited JSON records.
///
/// Push-only: the producer never waits for acknowledgement. A record never
/// contains an unescaped newline (serde_json escapes `\n` inside strings),
/// so the newline terminator is an unambiguous frame boundary.
pub struct StreamEncoder;

impl StreamEncoder {
    /// Encode one event as a single newline-terminated record.
    pub fn encode(event: &StreamEvent) -> CoreResult<String> {
        let mut record = serde_json::to_string(event)?;
        if record.contains('\n') {
            // serde_json escapes control characters inside strings, so this
            // is unreachable for well-formed events; keep the frame contract
            // explicit rather than silently emitting a split record.
            return Err(CoreError::internal("encoded event contains a raw newline"));
        }
        record.push('\n');
        Ok(record)
    }
}

/// Reassembles stream events from arbitrarily chunked transport reads.
///
/// One decoder instance per stream; the buffer must never be shared across
/// concurrent streams. The buffer is kept as raw bytes so a chunk split in
/// the middle of a multi-byte UTF-8 sequence decodes identically to an
/// unsplit read.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    /// Unterminated trailing fragment carried between reads.
    buffer: Vec<u8>,
}

impl StreamDecoder {
    /// Create a decoder with an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one transport chunk, returning every complete event it closes.
    ///
    /// Malformed lines are logged and dropped; they never stop subsequent
    /// lines from being parsed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            // Drop the terminator itself.
            if let Some(event) = Self::parse_line(&line[..line.len() - 1]) {
                events.push(event);
            }
        }
        events
    }

    /// Signal end-of-stream.
    ///
    /// Some transports omit the trailing newline on the last record, so a
    /// non-empty buffer is parsed as one final event. The buffer is cleared
    /// regardless of the parse outcome.
    pub fn flush(&mut self) -> Vec<StreamEvent> {
        let remainder = std::mem::take(&mut self.buffer);
        match Self::parse_line(&remainder) {
            Some(event) => vec![event],
            None => Vec::new(),
        }
    }

    /// Parse one complete line into an event. Blank lines are skipped;
    /// unparsable lines are logged and dropped.
    fn parse_line(line: &[u8]) -> Option<StreamEvent> {
        let text = String::from_utf8_lossy(line);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        match serde_json::from_str::<StreamEvent>(trimmed) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(error = %e, line = %trimmed, "dropping malformed stream record");
                None
            }
        }
    }
}
