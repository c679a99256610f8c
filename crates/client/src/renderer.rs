//! Incremental Renderer
//!
//! Turns a sequence of *cumulative* content snapshots into a smooth update
//! stream. Each snapshot carries the full message so far and supersedes the
//! previous one; a producer restart or correction may shrink or replace the
//! text, not just grow it.
//!
//! Two pieces:
//!
//! - `IncrementalRenderer` - computes the minimal visible update (append
//!   the new suffix, or reset when the snapshot is not an extension)
//! - `Typewriter` - paces the update character by character for perceived
//!   smoothness, without ever reordering or dropping characters
//!
//! A pacing run is fully flushed before the next snapshot is applied: the
//! emit future completes before the caller can apply another event, so
//! there is exactly one in-flight run per stream.

use std::time::Duration;

/// The minimal visible update for one content snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderUpdate {
    /// The snapshot extends the rendered text; append this suffix only.
    Append(String),
    /// The snapshot is not an extension; clear and render this full text.
    Reset(String),
}

impl RenderUpdate {
    /// The text this update makes newly visible.
    pub fn text(&self) -> &str {
        match self {
            RenderUpdate::Append(text) | RenderUpdate::Reset(text) => text,
        }
    }
}

/// Per-stream renderer state.
///
/// Invariant: `last` is always a value previously observed in a content
/// event, or the empty string before the first one.
#[derive(Debug, Default)]
pub struct IncrementalRenderer {
    last: String,
}

impl IncrementalRenderer {
    /// Renderer with nothing rendered yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one cumulative snapshot, returning the minimal update.
    pub fn apply_content(&mut self, full_text: &str) -> RenderUpdate {
        let update = if full_text.starts_with(&self.last) {
            // `last.len()` is a char boundary of `full_text` because
            // `full_text` starts with `last`.
            RenderUpdate::Append(full_text[self.last.len()..].to_string())
        } else {
            RenderUpdate::Reset(full_text.to_string())
        };
        self.last = full_text.to_string();
        update
    }

    /// The text rendered so far.
    pub fn rendered(&self) -> &str {
        &self.last
    }
}

/// Where paced characters land (a terminal cell, a widget, a test buffer).
pub trait RenderSink {
    /// Clear the rendered surface (reset case).
    fn clear(&mut self);
    /// Append one character.
    fn push_char(&mut self, ch: char);
}

impl RenderSink for String {
    fn clear(&mut self) {
        self.truncate(0);
    }
    fn push_char(&mut self, ch: char) {
        self.push(ch);
    }
}

/// Paces a render update character by character.
///
/// The delay is bounded and skipped for whitespace and punctuation so
/// pacing feels natural without slowing structural characters down.
pub struct Typewriter {
    char_delay: Duration,
}

impl Typewriter {
    /// Typewriter with the given per-character delay.
    pub fn new(char_delay: Duration) -> Self {
        Self { char_delay }
    }

    /// Typewriter with no delay, for tests and non-interactive callers.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Emit one update into the sink, in order, dropping nothing.
    ///
    /// Completion of the returned future is the flush point: callers must
    /// await it before applying the next content event.
    pub async fn emit<S: RenderSink + ?Sized>(&self, update: &RenderUpdate, sink: &mut S) {
        if matches!(update, RenderUpdate::Reset(_)) {
            sink.clear();
        }
        for ch in update.text().chars() {
            sink.push_char(ch);
            if !self.char_delay.is_zero() && !ch.is_whitespace() && !ch.is_ascii_punctuation() {
                tokio::time::sleep(self.char_delay).await;
            }
        }
    }
}
