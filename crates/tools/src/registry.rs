//! Tool Registry
//!
//! A fixed, process-lifetime mapping from task type to tool, built once at
//! startup and immutable thereafter. Matching is exact string equality on
//! the task type; only one tool may claim a given type, and registering a
//! duplicate is a configuration error surfaced at startup, not at dispatch
//! time.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use relay_core::{CoreError, CoreResult};

use crate::tool::{Tool, ToolDescriptor};

/// Registry mapping task types to tool instances.
///
/// Provides O(1) lookup by task type and ordered iteration. Built by
/// mutation at init; shared immutably (behind `Arc`) afterwards.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    /// Registration order for deterministic iteration.
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Register a tool under every task type its schemas declare.
    ///
    /// Fails with a configuration error if another tool already claims one
    /// of the types.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> CoreResult<()> {
        let schemas = tool.schemas();
        if schemas.is_empty() {
            return Err(CoreError::config(format!(
                "tool '{}' declares no task types",
                tool.name()
            )));
        }
        for schema in &schemas {
            if let Some(existing) = self.tools.get(schema.task_type) {
                return Err(CoreError::config(format!(
                    "task type '{}' already registered by tool '{}'",
                    schema.task_type,
                    existing.name()
                )));
            }
        }
        for schema in &schemas {
            self.tools.insert(schema.task_type.to_string(), Arc::clone(&tool));
            self.order.push(schema.task_type.to_string());
        }
        info!(tool = tool.name(), types = ?tool.descriptor().capabilities, "registered tool");
        Ok(())
    }

    /// Resolve the tool claiming a task type, if any.
    pub fn resolve(&self, task_type: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(task_type).cloned()
    }

    /// Check whether a task type is claimed.
    pub fn contains(&self, task_type: &str) -> bool {
        self.tools.contains_key(task_type)
    }

    /// All registered task types in registration order.
    pub fn task_types(&self) -> Vec<String> {
        self.order.clone()
    }

    /// Number of registered task types.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Descriptors for every registered tool, in registration order and
    /// deduplicated (a tool claiming several types appears once).
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        let mut seen = Vec::new();
        let mut out = Vec::new();
        for task_type in &self.order {
            if let Some(tool) = self.tools.get(task_type) {
                if !seen.contains(&tool.name().to_string()) {
                    seen.push(tool.name().to_string());
                    out.push(tool.descriptor());
                }
            }
        }
        out
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
