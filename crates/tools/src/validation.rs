//! Centralized Parameter Validation
//!
//! One declarative rule table per task type, interpreted by a single
//! validator. Tools declare their schema; the router runs validation before
//! execution so a tool is never invoked with invalid parameters.
//!
//! Policy notes:
//! - an empty or whitespace-only string is a validation failure, never
//!   silently accepted
//! - a non-string where a string is required is a validation failure; no
//!   type coercion is attempted
//! - validation is synchronous and pure

use serde_json::Value;
use url::Url;

use relay_core::Task;

/// Constraint applied to one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRule {
    /// A string that is non-empty after trimming
    NonEmptyString,
    /// A non-empty string that parses as a valid URL
    Url,
    /// A JSON object (not null, not a scalar)
    Object,
}

/// One required parameter and its rule.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    pub name: &'static str,
    pub rule: ParamRule,
}

/// The parameter schema a tool declares for one task type.
#[derive(Debug, Clone)]
pub struct TaskSchema {
    /// Task type this schema applies to (exact string match)
    pub task_type: &'static str,
    /// Required parameters in declaration order; the first failing one is
    /// reported
    pub params: Vec<ParamSpec>,
}

impl TaskSchema {
    /// Create a schema with no parameters.
    pub fn new(task_type: &'static str) -> Self {
        Self {
            task_type,
            params: Vec::new(),
        }
    }

    /// Add a required parameter.
    pub fn param(mut self, name: &'static str, rule: ParamRule) -> Self {
        self.params.push(ParamSpec { name, rule });
        self
    }
}

/// The first validation failure found for a task.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// The offending parameter name
    pub param: String,
    /// Caller-facing error message naming the field
    pub message: String,
    /// Machine-readable reason carried in result details
    pub reason: String,
}

impl ValidationIssue {
    fn new(param: &str, message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            param: param.to_string(),
            message: message.into(),
            reason: reason.into(),
        }
    }
}

/// Validate task params against a schema, reporting the first failure.
pub fn validate_params(schema: &TaskSchema, task: &Task) -> Result<(), ValidationIssue> {
    for spec in &schema.params {
        let value = match task.param(spec.name) {
            Some(value) => value,
            None => {
                return Err(ValidationIssue::new(
                    spec.name,
                    format!("Missing required parameter '{}'.", spec.name),
                    format!("Parameter '{}' is required.", spec.name),
                ))
            }
        };
        check_rule(spec, value)?;
    }
    Ok(())
}

fn check_rule(spec: &ParamSpec, value: &Value) -> Result<(), ValidationIssue> {
    match spec.rule {
        ParamRule::NonEmptyString => non_empty_string(spec.name, value).map(|_| ()),
        ParamRule::Url => {
            let text = non_empty_string(spec.name, value)?;
            match Url::parse(text) {
                Ok(_) => Ok(()),
                Err(e) => Err(ValidationIssue::new(
                    spec.name,
                    format!("Invalid URL format for '{}': {}", spec.name, e),
                    format!("Parameter '{}' must be a valid URL. Error: {}", spec.name, e),
                )),
            }
        }
        ParamRule::Object => {
            if value.is_object() {
                Ok(())
            } else {
                Err(ValidationIssue::new(
                    spec.name,
                    format!("Invalid '{}' parameter: Must be an object.", spec.name),
                    format!("Parameter '{}' must be an object.", spec.name),
                ))
            }
        }
    }
}

fn non_empty_string<'a>(name: &str, value: &'a Value) -> Result<&'a str, ValidationIssue> {
    match value.as_str() {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(ValidationIssue::new(
            name,
            format!("Invalid '{}' parameter: Must be a non-empty string.", name),
            format!("Parameter '{}' must be a non-empty string.", name),
        )),
    }
}
