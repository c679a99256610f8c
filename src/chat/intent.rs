//! MCP Intent Detection
//!
//! Keyword match over the user message, deciding whether the turn should
//! also trigger an automation action through the Zapier MCP tool. This is
//! deliberately shallow: the contract is "service + action + params", not
//! NLU.

use serde_json::{Map, Value};

/// A detected automation request.
#[derive(Debug, Clone, PartialEq)]
pub struct McpIntent {
    /// Target service (e.g. "gmail", "zoom")
    pub service: String,
    /// Action on that service
    pub action: String,
    /// Parameters forwarded as the task's `action_params`
    pub params: Map<String, Value>,
}

impl McpIntent {
    fn new(service: &str, action: &str, params: Map<String, Value>) -> Self {
        Self {
            service: service.to_string(),
            action: action.to_string(),
            params,
        }
    }
}

/// Detect an automation intent in a user message, if any.
pub fn detect(message: &str) -> Option<McpIntent> {
    let lower = message.to_lowercase();

    if contains_any(&lower, &["gmail", "email", "compose", "send mail"]) {
        let action = if contains_any(&lower, &["search", "find"]) {
            "search_emails"
        } else {
            "send_email"
        };
        let mut params = Map::new();
        params.insert("query".to_string(), Value::String(message.to_string()));
        return Some(McpIntent::new("gmail", action, params));
    }

    if contains_any(&lower, &["zoom", "meeting", "schedule"]) {
        let mut params = Map::new();
        params.insert("topic".to_string(), Value::String(message.to_string()));
        return Some(McpIntent::new("zoom", "create_meeting", params));
    }

    None
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}
