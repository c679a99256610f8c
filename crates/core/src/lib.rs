//! Relay Core
//!
//! Foundational error types, the task/result data model, and the stream
//! event protocol for the Relay gateway workspace. This crate has zero
//! dependencies on application-level code (HTTP server, tools, model
//! providers).
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `task` - Task data model (`Task`, `ExecutionResult`, `ResultDetails`)
//! - `streaming` - Stream event vocabulary, encoder, and chunk-reassembling
//!   decoder (`StreamEvent`, `StreamEncoder`, `StreamDecoder`)
//!
//! ## Design Principles
//!
//! 1. **Minimal dependencies** - serde/serde_json/thiserror/tracing only
//! 2. **One result shape** - every dispatch outcome, including failures,
//!    normalizes to `ExecutionResult` with a structured `details` map
//! 3. **Unidirectional dependency** - this crate depends on nothing else
//!    in the workspace

pub mod error;
pub mod streaming;
pub mod task;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Task Data Model ────────────────────────────────────────────────────
pub use task::{ExecutionResult, ResultDetails, Task};

// ── Streaming Protocol ─────────────────────────────────────────────────
pub use streaming::{StreamDecoder, StreamEncoder, StreamEvent};
