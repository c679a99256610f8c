//! Task Data Model
//!
//! A `Task` is a typed unit of work submitted for dispatch; an
//! `ExecutionResult` is the normalized, terminal outcome of executing one.
//! Every failure category (routing, validation, tool-reported failure,
//! tool exception) collapses into the same result shape so callers can
//! branch on `success` and the structured `details` map instead of parsing
//! error strings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A typed unit of work submitted for dispatch.
///
/// Immutable once submitted: the router consumes it exactly once and never
/// mutates it. `id` is caller-supplied and unique per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    /// Unique identifier for the task, echoed back in result details.
    pub id: String,
    /// Task type used for capability matching (e.g. "code_execution").
    #[serde(rename = "type")]
    pub task_type: String,
    /// Parameters specific to the task type.
    #[serde(default)]
    pub params: Map<String, Value>,
}

impl Task {
    /// Create a new task.
    pub fn new(id: impl Into<String>, task_type: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            task_type: task_type.into(),
            params,
        }
    }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }

    /// Look up a string parameter by name. Returns None for non-strings
    /// (no type coercion is attempted).
    pub fn str_param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }
}

/// The normalized outcome of executing a task.
///
/// `error` is set iff `success` is false. `details` is always a structured
/// map (never a free-form string) so callers can branch programmatically on
/// fields like `taskId`, `problematicParam`, or `reason`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExecutionResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Output from successful execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    /// Error message from failed execution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable diagnostic fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

impl ExecutionResult {
    /// Create a successful result
    pub fn ok(output: impl Into<Value>) -> Self {
        Self {
            success: true,
            output: Some(output.into()),
            error: None,
            details: None,
        }
    }

    /// Create a failed result
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: None,
            error: Some(error.into()),
            details: None,
        }
    }

    /// Attach structured details to this result
    pub fn with_details(mut self, details: ResultDetails) -> Self {
        self.details = Some(details.into_map());
        self
    }
}

/// Builder for the structured `details` map carried by every result.
///
/// Keys use the wire casing observed by consumers (`taskId`,
/// `problematicParam`), not Rust naming.
#[derive(Debug, Default, Clone)]
pub struct ResultDetails(Map<String, Value>);

impl ResultDetails {
    /// Create an empty details map
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the `taskId` field
    pub fn task_id(mut self, id: &str) -> Self {
        self.0.insert("taskId".to_string(), Value::String(id.to_string()));
        self
    }

    /// Set the `problematicParam` field (validation failures)
    pub fn problematic_param(mut self, param: &str) -> Self {
        self.0
            .insert("problematicParam".to_string(), Value::String(param.to_string()));
        self
    }

    /// Set the `reason` field
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.0.insert("reason".to_string(), Value::String(reason.into()));
        self
    }

    /// Set the `tool` field (exception containment)
    pub fn tool(mut self, name: &str) -> Self {
        self.0.insert("tool".to_string(), Value::String(name.to_string()));
        self
    }

    /// Insert an arbitrary field
    pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    /// Consume the builder, yielding the underlying map
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
