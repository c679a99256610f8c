//! OpenAI-Compatible Provider
//!
//! Streams chat completions over the OpenAI-compatible SSE format
//! (`data: {...}` lines, `data: [DONE]` terminator). Both configured
//! backends expose this surface, so one provider covers them; the
//! selection name distinguishes the endpoints.

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use relay_core::{CoreError, CoreResult};

use crate::config::ModelConfig;

use super::{ChatModel, ModelChunk};

/// SSE wire shape for one completion chunk. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct ChunkPayload {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    delta: Delta,
}

#[derive(Debug, Default, Deserialize)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
    /// Reasoning text some backends interleave with content.
    #[serde(default)]
    reasoning_content: Option<String>,
}

/// Provider speaking the OpenAI-compatible chat completions API.
pub struct OpenAiCompatModel {
    config: ModelConfig,
    http: reqwest::Client,
}

impl OpenAiCompatModel {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Parse one SSE line into chunks, tolerating non-data lines.
    fn adapt_line(line: &str) -> Vec<ModelChunk> {
        let trimmed = line.trim();
        let json_str = match trimmed.strip_prefix("data: ") {
            Some(rest) => rest,
            // Skip event:, id:, retry:, comments, and blank lines.
            None => return Vec::new(),
        };
        if json_str.is_empty() || json_str == "[DONE]" {
            return Vec::new();
        }

        let payload: ChunkPayload = match serde_json::from_str(json_str) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "dropping malformed completion chunk");
                return Vec::new();
            }
        };

        let mut chunks = Vec::new();
        for choice in payload.choices {
            if let Some(thinking) = choice.delta.reasoning_content {
                if !thinking.is_empty() {
                    chunks.push(ModelChunk::Thinking(thinking));
                }
            }
            if let Some(content) = choice.delta.content {
                if !content.is_empty() {
                    chunks.push(ModelChunk::Delta(content));
                }
            }
        }
        chunks
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatModel {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn stream_reply(&self, message: &str) -> CoreResult<mpsc::Receiver<CoreResult<ModelChunk>>> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": message}],
            "stream": true,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(CoreError::network(format!(
                "{} returned status {}: {}",
                self.config.name,
                status.as_u16(),
                text
            )));
        }

        debug!(model = %self.config.name, "completion stream opened");

        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut buffer = String::new();

            while let Some(chunk) = stream.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        let _ = tx.send(Err(CoreError::network(e.to_string()))).await;
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                // Process complete lines
                while let Some(line_end) = buffer.find('\n') {
                    let line = buffer[..line_end].to_string();
                    buffer = buffer[line_end + 1..].to_string();

                    for parsed in Self::adapt_line(&line) {
                        if tx.send(Ok(parsed)).await.is_err() {
                            return;
                        }
                    }
                }
            }

            for parsed in Self::adapt_line(&buffer) {
                if tx.send(Ok(parsed)).await.is_err() {
                    return;
                }
            }
        });

        Ok(rx)
    }
}
