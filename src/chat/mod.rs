//! Chat Turn Orchestration
//!
//! - `pipeline` - runs one turn: metadata, model streaming with fallback,
//!   automation dispatch, terminal `done`
//! - `intent` - keyword-level MCP intent detection

pub mod intent;
pub mod pipeline;

pub use intent::McpIntent;
pub use pipeline::ChatPipeline;
