//! Code Executor Tool
//!
//! Handles `code_execution` tasks. The actual sandbox is externally owned;
//! this tool only carries its contract, so the sandbox sits behind a trait
//! and the default implementation returns a canned result.

use std::sync::Arc;

use async_trait::async_trait;

use relay_core::{CoreResult, ExecutionResult, ResultDetails, Task};

use crate::tool::Tool;
use crate::validation::{ParamRule, TaskSchema};

/// Execution backend for submitted code.
///
/// An `Err` from `run` is treated as a tool exception and contained by the
/// router; a sandbox that ran the code and observed a program failure
/// should report it in the returned output instead.
#[async_trait]
pub trait CodeSandbox: Send + Sync {
    async fn run(&self, code: &str) -> CoreResult<String>;
}

/// Stand-in sandbox that accepts any non-empty program and returns a
/// canned output, mirroring the upstream mock executor.
pub struct StubSandbox;

#[async_trait]
impl CodeSandbox for StubSandbox {
    async fn run(&self, _code: &str) -> CoreResult<String> {
        Ok("Mock output from Python execution.".to_string())
    }
}

/// Tool claiming the `code_execution` task type.
pub struct CodeExecutor {
    sandbox: Arc<dyn CodeSandbox>,
}

impl CodeExecutor {
    /// Create an executor over a sandbox implementation.
    pub fn new(sandbox: Arc<dyn CodeSandbox>) -> Self {
        Self { sandbox }
    }

    /// Executor backed by the stub sandbox.
    pub fn stub() -> Self {
        Self::new(Arc::new(StubSandbox))
    }
}

#[async_trait]
impl Tool for CodeExecutor {
    fn name(&self) -> &str {
        "CodeExecutor"
    }

    fn description(&self) -> &str {
        "Executes a code snippet in a sandbox and returns its output."
    }

    fn schemas(&self) -> Vec<TaskSchema> {
        vec![TaskSchema::new("code_execution").param("code", ParamRule::NonEmptyString)]
    }

    async fn execute(&self, task: &Task) -> CoreResult<ExecutionResult> {
        // The router already validated; re-check defensively rather than
        // relying on it.
        let code = match task.str_param("code") {
            Some(code) if !code.trim().is_empty() => code,
            _ => {
                return Ok(ExecutionResult::failure("Input code cannot be empty.")
                    .with_details(ResultDetails::new().task_id(&task.id).problematic_param("code")))
            }
        };

        let output = self.sandbox.run(code).await?;
        Ok(ExecutionResult::ok(output).with_details(ResultDetails::new().task_id(&task.id)))
    }
}
