//! Task Router
//!
//! Consumes a task, matches it to the registered tool by capability,
//! validates its parameters, invokes the tool, and normalizes every outcome
//! into one `ExecutionResult` shape.
//!
//! Failure-containment invariant: `dispatch` never returns an error and
//! never lets a tool failure escape. One failing tool must never crash the
//! dispatch path for other tasks. The four stages are strictly ordered:
//!
//! 1. resolve - no tool for the type is a routing failure, no tool invoked
//! 2. validate - the tool is never invoked with invalid parameters
//! 3. invoke - a result the tool returned is passed through unchanged
//! 4. contain - a tool error is converted to a failure result tagged with
//!    the tool's name

use std::sync::Arc;

use tracing::{debug, warn};

use relay_core::{ExecutionResult, ResultDetails, Task};

use crate::registry::ToolRegistry;
use crate::validation::validate_params;

/// Routes tasks to registered tools.
///
/// Holds no mutable state beyond the immutable registry; each task is
/// processed independently, so dispatch calls need no synchronization.
pub struct TaskRouter {
    registry: Arc<ToolRegistry>,
}

impl TaskRouter {
    /// Create a router over a finished registry.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// The registry backing this router.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Dispatch a task, normalizing every outcome into one result shape.
    pub async fn dispatch(&self, task: &Task) -> ExecutionResult {
        debug!(task_id = %task.id, task_type = %task.task_type, "dispatching task");

        // 1. Capability matching: exact string equality on task type.
        let tool = match self.registry.resolve(&task.task_type) {
            Some(tool) => tool,
            None => {
                warn!(task_type = %task.task_type, "no tool for task type");
                return ExecutionResult::failure(format!(
                    "No tool available to handle task type: {}",
                    task.task_type
                ))
                .with_details(ResultDetails::new().task_id(&task.id));
            }
        };

        // 2. Validation, before the tool sees the task.
        if let Some(schema) = tool.schemas().into_iter().find(|s| s.task_type == task.task_type) {
            if let Err(issue) = validate_params(&schema, task) {
                debug!(task_id = %task.id, param = %issue.param, "task failed validation");
                return ExecutionResult::failure(issue.message).with_details(
                    ResultDetails::new()
                        .task_id(&task.id)
                        .problematic_param(&issue.param)
                        .reason(issue.reason),
                );
            }
        }

        // 3 + 4. Invoke, passing a returned result through unchanged and
        // containing anything the tool raises.
        match tool.execute(task).await {
            Ok(result) => result,
            Err(e) => {
                warn!(task_id = %task.id, tool = tool.name(), error = %e, "tool raised during execution");
                ExecutionResult::failure(e.to_string())
                    .with_details(ResultDetails::new().task_id(&task.id).tool(tool.name()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::Tool;
    use crate::validation::{ParamRule, TaskSchema};
    use async_trait::async_trait;
    use relay_core::{CoreError, CoreResult};
    use serde_json::{json, Map, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Tool double that counts invocations and returns a canned outcome.
    struct CountingTool {
        calls: Arc<AtomicUsize>,
        outcome: fn() -> CoreResult<ExecutionResult>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn name(&self) -> &str {
            "CountingTool"
        }
        fn description(&self) -> &str {
            "records invocations"
        }
        fn schemas(&self) -> Vec<TaskSchema> {
            vec![TaskSchema::new("counted_task").param("input", ParamRule::NonEmptyString)]
        }
        async fn execute(&self, _task: &Task) -> CoreResult<ExecutionResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.outcome)()
        }
    }

    fn router_with(outcome: fn() -> CoreResult<ExecutionResult>) -> (TaskRouter, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(CountingTool {
                calls: Arc::clone(&calls),
                outcome,
            }))
            .unwrap();
        (TaskRouter::new(Arc::new(registry)), calls)
    }

    fn task(task_type: &str, params: Value) -> Task {
        let params: Map<String, Value> = serde_json::from_value(params).unwrap();
        Task::new("t1", task_type, params)
    }

    #[tokio::test]
    async fn test_unknown_type_is_routing_failure_without_invocation() {
        let (router, calls) = router_with(|| Ok(ExecutionResult::ok("x")));
        let result = router.dispatch(&task("unknown_type", json!({}))).await;

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("No tool available to handle task type: unknown_type")
        );
        assert_eq!(result.details.unwrap()["taskId"], json!("t1"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_param_blocks_execution() {
        let (router, calls) = router_with(|| Ok(ExecutionResult::ok("x")));
        let result = router.dispatch(&task("counted_task", json!({}))).await;

        assert!(!result.success);
        let details = result.details.unwrap();
        assert_eq!(details["taskId"], json!("t1"));
        assert_eq!(details["problematicParam"], json!("input"));
        assert!(details["reason"].as_str().unwrap().contains("input"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_whitespace_param_blocks_execution() {
        let (router, calls) = router_with(|| Ok(ExecutionResult::ok("x")));
        let result = router.dispatch(&task("counted_task", json!({"input": "  "}))).await;

        assert!(!result.success);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_valid_task_result_passes_through_unchanged() {
        let (router, calls) = router_with(|| {
            Ok(ExecutionResult::ok(json!({"answer": 42}))
                .with_details(ResultDetails::new().task_id("tool-chosen-id").field("extra", "kept")))
        });
        let result = router.dispatch(&task("counted_task", json!({"input": "go"}))).await;

        // Pass-through identity: the router does not re-wrap or re-tag.
        assert!(result.success);
        assert_eq!(result.output, Some(json!({"answer": 42})));
        let details = result.details.unwrap();
        assert_eq!(details["taskId"], json!("tool-chosen-id"));
        assert_eq!(details["extra"], json!("kept"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_tool_reported_failure_passes_through() {
        let (router, _) = router_with(|| Ok(ExecutionResult::failure("remote said no")));
        let result = router.dispatch(&task("counted_task", json!({"input": "go"}))).await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("remote said no"));
        // Not re-classified: no tool tag added by the router.
        assert!(result.details.is_none());
    }

    #[tokio::test]
    async fn test_tool_error_is_contained_and_tagged() {
        let (router, calls) = router_with(|| Err(CoreError::network("connection reset")));
        let result = router.dispatch(&task("counted_task", json!({"input": "go"}))).await;

        assert!(!result.success);
        assert!(result.error.as_deref().unwrap().contains("connection reset"));
        let details = result.details.unwrap();
        assert_eq!(details["taskId"], json!("t1"));
        assert_eq!(details["tool"], json!("CountingTool"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_tool_does_not_poison_later_dispatches() {
        let (router, calls) = router_with(|| Err(CoreError::internal("boom")));
        let first = router.dispatch(&task("counted_task", json!({"input": "a"}))).await;
        let second = router.dispatch(&task("counted_task", json!({"input": "b"}))).await;

        assert!(!first.success);
        assert!(!second.success);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
