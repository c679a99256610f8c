//! Web Fetcher Tool
//!
//! Handles `web_fetch` tasks: a bounded-timeout GET of the given URL. Only
//! GET is supported; any other requested method is a tool-level failure.
//! Transport errors (including timeouts) surface as normal failure results.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use relay_core::{CoreResult, ExecutionResult, ResultDetails, Task};

use crate::builtin::build_http_client;
use crate::tool::Tool;
use crate::validation::{ParamRule, TaskSchema};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Tool claiming the `web_fetch` task type.
pub struct WebFetcher {
    http: reqwest::Client,
}

impl WebFetcher {
    /// Fetcher with the default request timeout.
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Fetcher with an explicit request timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            http: build_http_client(timeout),
        }
    }
}

impl Default for WebFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebFetcher {
    fn name(&self) -> &str {
        "WebFetcher"
    }

    fn description(&self) -> &str {
        "Fetches content from a given URL."
    }

    fn schemas(&self) -> Vec<TaskSchema> {
        vec![TaskSchema::new("web_fetch").param("url", ParamRule::Url)]
    }

    async fn execute(&self, task: &Task) -> CoreResult<ExecutionResult> {
        let url = task.str_param("url").unwrap_or_default().to_string();

        if let Some(method) = task.str_param("method") {
            if !method.eq_ignore_ascii_case("GET") {
                return Ok(ExecutionResult::failure(format!(
                    "HTTP method {} is not supported by WebFetcher. Only GET is allowed.",
                    method
                ))
                .with_details(ResultDetails::new().task_id(&task.id).field("url", url)));
            }
        }

        debug!(task_id = %task.id, url = %url, "fetching URL");

        match self.http.get(&url).send().await {
            Ok(response) => {
                let status = response.status();
                let details = ResultDetails::new()
                    .task_id(&task.id)
                    .field("url", url)
                    .field("status", status.as_u16());
                match response.text().await {
                    Ok(body) if status.is_success() => Ok(ExecutionResult::ok(body).with_details(details)),
                    Ok(_) => Ok(ExecutionResult::failure(format!(
                        "Request failed with status code {}",
                        status.as_u16()
                    ))
                    .with_details(details)),
                    Err(e) => Ok(ExecutionResult::failure(e.to_string()).with_details(details)),
                }
            }
            Err(e) => {
                let mut details = ResultDetails::new().task_id(&task.id).field("url", url);
                if let Some(status) = e.status() {
                    details = details.field("status", status.as_u16());
                }
                Ok(ExecutionResult::failure(e.to_string()).with_details(details))
            }
        }
    }
}
