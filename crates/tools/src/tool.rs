//! Tool Trait
//!
//! The tool abstraction consumed by the registry and the task router. A
//! tool is a named capability that accepts a typed task and returns a
//! normalized result; its external side effects (sandbox, HTTP fetch,
//! third-party automation) are owned by the implementation.

use async_trait::async_trait;
use serde::Serialize;

use relay_core::{CoreResult, ExecutionResult, Task};

use crate::validation::TaskSchema;

/// Registry-facing description of a tool: its name and the task types it
/// accepts.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolDescriptor {
    /// Unique name within the registry (e.g. "WebFetcher")
    pub name: String,
    /// Task types this tool accepts
    pub capabilities: Vec<String>,
}

/// A named, registered executor of one or more task types.
///
/// The router, not the tool, enforces parameter validation: `execute` is
/// never invoked with parameters that fail the tool's declared schema.
/// Implementations may still re-validate defensively.
///
/// Returning `Err` from `execute` is the "tool exception" path: the router
/// catches it and converts it to a failure result tagged with the tool's
/// name. A tool that ran and observed its own failure (HTTP error, MCP
/// rejection, timeout) should instead return `Ok` with a failure
/// `ExecutionResult`, which the router passes through unchanged.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of this tool (e.g. "CodeExecutor")
    fn name(&self) -> &str;

    /// Human-readable description of what this tool does
    fn description(&self) -> &str;

    /// Parameter schemas, one per task type this tool accepts.
    ///
    /// The router validates task params against the matching schema before
    /// invoking `execute`.
    fn schemas(&self) -> Vec<TaskSchema>;

    /// Execute the task, producing a terminal result.
    async fn execute(&self, task: &Task) -> CoreResult<ExecutionResult>;

    /// Descriptor derived from the declared schemas.
    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            capabilities: self.schemas().iter().map(|s| s.task_type.to_string()).collect(),
        }
    }
}
