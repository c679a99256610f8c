//! Zapier MCP Tool
//!
//! Handles `zapier_mcp_action` tasks: posts the requested action and its
//! parameters to the task-supplied MCP endpoint with a bounded wait. An
//! MCP-reported failure passes through as a failure result; so does a
//! timeout. Nothing here raises past `execute` except serialization faults.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use relay_core::{CoreResult, ExecutionResult, ResultDetails, Task};

use crate::builtin::build_http_client;
use crate::tool::Tool;
use crate::validation::{ParamRule, TaskSchema};

/// Bounded wait observed for MCP calls upstream.
const MCP_TIMEOUT: Duration = Duration::from_secs(30);

/// Tool claiming the `zapier_mcp_action` task type.
pub struct ZapierMcpTool {
    http: reqwest::Client,
}

impl ZapierMcpTool {
    /// Tool with the standard 30s MCP wait.
    pub fn new() -> Self {
        Self::with_timeout(MCP_TIMEOUT)
    }

    /// Tool with an explicit wait, for tests.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
        }
    }

    fn base_details(task: &Task, action: &str, mcp_url: &str) -> ResultDetails {
        ResultDetails::new()
            .task_id(&task.id)
            .field("action", action)
            .field("mcp_url", mcp_url)
    }
}

impl Default for ZapierMcpTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ZapierMcpTool {
    fn name(&self) -> &str {
        "ZapierMCPTool"
    }

    fn description(&self) -> &str {
        "Interacts with Zapier via Model Context Protocol."
    }

    fn schemas(&self) -> Vec<TaskSchema> {
        vec![TaskSchema::new("zapier_mcp_action")
            .param("action", ParamRule::NonEmptyString)
            .param("zapier_mcp_url", ParamRule::Url)
            .param("action_params", ParamRule::Object)]
    }

    async fn execute(&self, task: &Task) -> CoreResult<ExecutionResult> {
        let action = task.str_param("action").unwrap_or_default().to_string();
        let mcp_url = task.str_param("zapier_mcp_url").unwrap_or_default().to_string();
        let action_params = task.param("action_params").cloned().unwrap_or(Value::Null);

        debug!(task_id = %task.id, action = %action, mcp_url = %mcp_url, "executing MCP action");

        let request = json!({
            "action": action,
            "parameters": action_params,
            "metadata": {
                "taskId": task.id,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            },
        });

        let response = match self.http.post(&mcp_url).json(&request).send().await {
            Ok(response) => response,
            Err(e) => {
                return Ok(ExecutionResult::failure(e.to_string()).with_details(
                    Self::base_details(task, &action, &mcp_url).reason("Unexpected error during MCP execution"),
                ))
            }
        };

        // Status first: a rejected request reports its status code even
        // when the error body is not JSON.
        let status = response.status();
        if !status.is_success() {
            return Ok(
                ExecutionResult::failure(format!("MCP request failed with status code {}", status.as_u16()))
                    .with_details(
                        Self::base_details(task, &action, &mcp_url)
                            .field("status", status.as_u16())
                            .reason("MCP endpoint rejected the request"),
                    ),
            );
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                return Ok(ExecutionResult::failure(format!("Invalid MCP response: {}", e)).with_details(
                    Self::base_details(task, &action, &mcp_url).reason("MCP endpoint returned a non-JSON body"),
                ))
            }
        };

        // MCP body shape: { success, data?, error?, id? }.
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("MCP request failed without specific error message")
                .to_string();
            let mut details = Self::base_details(task, &action, &mcp_url).reason("MCP reported execution failure");
            if let Some(id) = body.get("id").and_then(Value::as_str) {
                details = details.field("responseId", id);
            }
            return Ok(ExecutionResult::failure(message).with_details(details));
        }

        let output = body.get("data").cloned().unwrap_or(body);
        Ok(ExecutionResult::ok(output).with_details(Self::base_details(task, &action, &mcp_url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn task(params: Value) -> Task {
        let params: Map<String, Value> = serde_json::from_value(params).unwrap();
        Task::new("t3", "zapier_mcp_action", params)
    }

    #[test]
    fn test_schema_requires_all_three_params() {
        let tool = ZapierMcpTool::new();
        let schemas = tool.schemas();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].task_type, "zapier_mcp_action");
        let names: Vec<_> = schemas[0].params.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["action", "zapier_mcp_url", "action_params"]);
    }

    #[tokio::test]
    async fn test_non_2xx_with_plain_text_body_reports_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let response = "HTTP/1.1 502 Bad Gateway\r\n\
                            content-type: text/plain\r\n\
                            content-length: 11\r\n\
                            connection: close\r\n\r\n\
                            bad gateway";
            let _ = socket.write_all(response.as_bytes()).await;
        });

        let tool = ZapierMcpTool::with_timeout(Duration::from_secs(2));
        let result = tool
            .execute(&task(json!({
                "action": "send_email",
                "zapier_mcp_url": format!("http://{addr}/mcp"),
                "action_params": {}
            })))
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(
            result.error.as_deref(),
            Some("MCP request failed with status code 502")
        );
        let details = result.details.unwrap();
        assert_eq!(details["status"], json!(502));
        assert_eq!(details["reason"], json!("MCP endpoint rejected the request"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_normal_failure() {
        let tool = ZapierMcpTool::with_timeout(Duration::from_secs(2));
        let result = tool
            .execute(&task(json!({
                "action": "send_email",
                "zapier_mcp_url": "http://nonexistent.invalid/mcp",
                "action_params": {"to": "a@b.c"}
            })))
            .await
            .unwrap();

        assert!(!result.success);
        let details = result.details.unwrap();
        assert_eq!(details["taskId"], json!("t3"));
        assert_eq!(details["action"], json!("send_email"));
        assert_eq!(details["reason"], json!("Unexpected error during MCP execution"));
    }
}
