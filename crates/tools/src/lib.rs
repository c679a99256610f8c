//! Relay Tools
//!
//! Capability matching and task execution for the Relay gateway:
//!
//! - `tool` - the `Tool` trait and registry-facing descriptor
//! - `registry` - process-lifetime task-type → tool mapping
//! - `validation` - centralized, declarative parameter schemas
//! - `router` - dispatch with validation and failure containment
//! - `builtin` - the shipped tools (code executor, web fetcher, Zapier MCP)
//!
//! The router is the enforcement point for the validation contract: a
//! tool's `execute` is never invoked with parameters that fail its declared
//! schema, and no tool failure ever escapes `dispatch`.

pub mod builtin;
pub mod registry;
pub mod router;
pub mod tool;
pub mod validation;

// ── Tool Abstraction ───────────────────────────────────────────────────
pub use tool::{Tool, ToolDescriptor};

// ── Registry & Router ──────────────────────────────────────────────────
pub use registry::ToolRegistry;
pub use router::TaskRouter;

// ── Validation ─────────────────────────────────────────────────────────
pub use validation::{validate_params, ParamRule, ParamSpec, TaskSchema, ValidationIssue};

// ── Builtin Tools ──────────────────────────────────────────────────────
pub use builtin::{CodeExecutor, CodeSandbox, StubSandbox, WebFetcher, ZapierMcpTool};
