//! Relay Client
//!
//! Consumer side of the Relay streaming protocol:
//!
//! - `stream` - `ChatStreamClient`, decoding the chunked response body into
//!   one ordered channel of typed events
//! - `renderer` - incremental rendering of cumulative content snapshots
//!   with character pacing
//! - `queue` - per-session FIFO keeping at most one stream in flight
//!
//! Each stream gets its own decoder and renderer instance; the queue is the
//! only shared mutable structure per session.

pub mod queue;
pub mod renderer;
pub mod stream;

// ── Stream Consumption ─────────────────────────────────────────────────
pub use stream::ChatStreamClient;

// ── Incremental Rendering ──────────────────────────────────────────────
pub use renderer::{IncrementalRenderer, RenderSink, RenderUpdate, Typewriter};

// ── Request Queue ──────────────────────────────────────────────────────
pub use queue::{RequestQueue, StreamRequest, StreamRunner};
