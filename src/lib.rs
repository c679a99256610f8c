//! Relay Gateway
//!
//! HTTP gateway tying the pieces together: the task router and builtin
//! tools (`relay-tools`), the shared protocol types (`relay-core`), chat
//! model providers, and the streaming chat pipeline.
//!
//! - `config` - environment-derived settings
//! - `llm` - chat model providers and selection
//! - `chat` - per-turn pipeline and intent detection
//! - `routes` - the HTTP surface
//! - `state` - shared per-process state

pub mod chat;
pub mod config;
pub mod llm;
pub mod routes;
pub mod state;

// ── Re-exports ─────────────────────────────────────────────────────────
pub use config::{GatewayConfig, ModelConfig};
pub use routes::build_router;
pub use state::AppState;
