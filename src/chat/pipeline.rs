//! Chat Pipeline
//!
//! Drives one chat turn end to end: announce metadata, stream the model
//! reply as cumulative content snapshots, fall back on connection failure,
//! then run any detected automation action through the task router. Every
//! event goes out on one channel, and the pipeline always closes the turn
//! with a terminal `done` event.

use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

use relay_core::{StreamEvent, Task};
use relay_tools::TaskRouter;

use crate::llm::{ModelChunk, ModelSet};

use super::intent;

/// One chat turn's event producer.
pub struct ChatPipeline {
    models: Arc<ModelSet>,
    router: Arc<TaskRouter>,
    zapier_mcp_url: Option<String>,
}

impl ChatPipeline {
    pub fn new(models: Arc<ModelSet>, router: Arc<TaskRouter>, zapier_mcp_url: Option<String>) -> Self {
        Self {
            models,
            router,
            zapier_mcp_url,
        }
    }

    /// Run one turn, sending events on `tx` until the terminal `done`.
    ///
    /// Sends stop silently once the receiver is dropped; a disconnected
    /// client is not an error.
    pub async fn run(&self, message: String, requested_model: String, tx: mpsc::Sender<StreamEvent>) {
        let message_id = Uuid::new_v4().to_string();
        info!(%message_id, model = %requested_model, "chat turn started");

        if !send(
            &tx,
            StreamEvent::Metadata {
                message_id: message_id.clone(),
                model: Some(requested_model.clone()),
            },
        )
        .await
        {
            return;
        }

        let streamed = self.stream_model_reply(&message, &requested_model, &tx).await;
        match streamed {
            StreamOutcome::Disconnected => return,
            StreamOutcome::Failed => {
                let _ = tx.send(StreamEvent::Done).await;
                return;
            }
            StreamOutcome::Completed => {}
        }

        if !self.run_automation(&message, &message_id, &tx).await {
            return;
        }

        let _ = tx.send(StreamEvent::Done).await;
    }

    /// Stream the reply from the selected model, with one fallback attempt
    /// when the connection cannot be opened.
    async fn stream_model_reply(
        &self,
        message: &str,
        requested_model: &str,
        tx: &mpsc::Sender<StreamEvent>,
    ) -> StreamOutcome {
        let Some(model) = self.models.select(requested_model) else {
            let _ = tx
                .send(StreamEvent::Error {
                    text: "No chat models are configured.".to_string(),
                })
                .await;
            return StreamOutcome::Failed;
        };

        if !send(
            tx,
            StreamEvent::Status {
                text: format!("Connecting to {}...", model.name()),
            },
        )
        .await
        {
            return StreamOutcome::Disconnected;
        }

        let (model, mut rx) = match model.stream_reply(message).await {
            Ok(rx) => (model, rx),
            Err(e) => {
                warn!(model = %model.name(), error = %e, "model connection failed");
                let Some(fallback) = self.models.fallback_for(model.name()) else {
                    let _ = tx
                        .send(StreamEvent::Error {
                            text: format!("Failed to connect to {}: {}", model.name(), e),
                        })
                        .await;
                    return StreamOutcome::Failed;
                };

                if !send(
                    tx,
                    StreamEvent::Status {
                        text: format!(
                            "{} connection failed, falling back to {}...",
                            model.name(),
                            fallback.name()
                        ),
                    },
                )
                .await
                {
                    return StreamOutcome::Disconnected;
                }

                match fallback.stream_reply(message).await {
                    Ok(rx) => (fallback, rx),
                    Err(fallback_err) => {
                        warn!(model = %fallback.name(), error = %fallback_err, "fallback connection failed");
                        let _ = tx
                            .send(StreamEvent::Error {
                                text: format!(
                                    "Failed to connect to {}: {}",
                                    fallback.name(),
                                    fallback_err
                                ),
                            })
                            .await;
                        return StreamOutcome::Failed;
                    }
                }
            }
        };

        // Content snapshots are cumulative: each event carries the full
        // reply so far, so a consumer can join mid-stream.
        let mut full_text = String::new();
        while let Some(item) = rx.recv().await {
            let chunk = match item {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!(model = %model.name(), error = %e, "model stream broke mid-reply");
                    if !send(tx, StreamEvent::Error { text: e.to_string() }).await {
                        return StreamOutcome::Disconnected;
                    }
                    return StreamOutcome::Failed;
                }
            };

            let event = match chunk {
                ModelChunk::Delta(delta) => {
                    full_text.push_str(&delta);
                    StreamEvent::Content {
                        text: full_text.clone(),
                        model_used: Some(model.name().to_string()),
                    }
                }
                ModelChunk::Thinking(text) => StreamEvent::Thinking { text },
            };
            if !send(tx, event).await {
                return StreamOutcome::Disconnected;
            }
        }

        StreamOutcome::Completed
    }

    /// Detect and execute an automation intent, reporting action and result
    /// events. Returns false when the receiver is gone.
    async fn run_automation(&self, message: &str, message_id: &str, tx: &mpsc::Sender<StreamEvent>) -> bool {
        let Some(intent) = intent::detect(message) else {
            return true;
        };

        info!(%message_id, service = %intent.service, action = %intent.action, "automation intent detected");

        if !send(
            tx,
            StreamEvent::McpAction {
                service: intent.service.clone(),
                action: intent.action.clone(),
            },
        )
        .await
        {
            return false;
        }

        let mut params = Map::new();
        params.insert("action".to_string(), Value::String(intent.action.clone()));
        params.insert(
            "zapier_mcp_url".to_string(),
            Value::String(self.zapier_mcp_url.clone().unwrap_or_default()),
        );
        params.insert("action_params".to_string(), Value::Object(intent.params));

        let task = Task {
            id: Uuid::new_v4().to_string(),
            task_type: "zapier_mcp_action".to_string(),
            params,
        };
        let result = self.router.dispatch(&task).await;

        send(
            tx,
            StreamEvent::McpResult {
                service: intent.service,
                action: intent.action,
                result,
            },
        )
        .await
    }
}

/// How the model-streaming phase ended.
enum StreamOutcome {
    /// Reply finished; continue the turn
    Completed,
    /// Reply failed after an error event; close with `done`
    Failed,
    /// Receiver dropped; stop producing
    Disconnected,
}

async fn send(tx: &mpsc::Sender<StreamEvent>, event: StreamEvent) -> bool {
    tx.send(event).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ScriptedModel;
    use relay_tools::ToolRegistry;

    fn pipeline_with(models: ModelSet) -> ChatPipeline {
        let registry = ToolRegistry::new();
        ChatPipeline::new(
            Arc::new(models),
            Arc::new(TaskRouter::new(Arc::new(registry))),
            None,
        )
    }

    async fn collect(pipeline: ChatPipeline, message: &str, model: &str) -> Vec<StreamEvent> {
        let (tx, mut rx) = mpsc::channel(32);
        pipeline.run(message.to_string(), model.to_string(), tx).await;
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_turn_frames_metadata_then_content_then_done() {
        let mut models = ModelSet::new("test", None);
        models.insert(Arc::new(ScriptedModel::from_deltas("test", &["Hel", "lo"])));
        let events = collect(pipeline_with(models), "hi", "test").await;

        assert!(matches!(events[0], StreamEvent::Metadata { .. }));
        assert!(matches!(events.last(), Some(StreamEvent::Done)));

        let snapshots: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Content { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(snapshots, vec!["Hel", "Hello"]);
    }

    #[tokio::test]
    async fn test_fallback_on_connection_failure() {
        let mut models = ModelSet::new("primary", Some("backup".to_string()));
        models.insert(Arc::new(ScriptedModel::failing("primary", "refused")));
        models.insert(Arc::new(ScriptedModel::from_deltas("backup", &["ok"])));
        let events = collect(pipeline_with(models), "hi", "primary").await;

        let statuses: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                StreamEvent::Status { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(statuses.iter().any(|s| s.contains("falling back to backup")));

        let used = events.iter().find_map(|e| match e {
            StreamEvent::Content { model_used, .. } => model_used.clone(),
            _ => None,
        });
        assert_eq!(used.as_deref(), Some("backup"));
        assert!(matches!(events.last(), Some(StreamEvent::Done)));
    }

    #[tokio::test]
    async fn test_both_models_failing_still_ends_with_done() {
        let mut models = ModelSet::new("primary", Some("backup".to_string()));
        models.insert(Arc::new(ScriptedModel::failing("primary", "refused")));
        models.insert(Arc::new(ScriptedModel::failing("backup", "also refused")));
        let events = collect(pipeline_with(models), "hi", "primary").await;

        assert!(events.iter().any(|e| matches!(e, StreamEvent::Error { .. })));
        assert!(matches!(events.last(), Some(StreamEvent::Done)));
    }

    #[tokio::test]
    async fn test_no_models_configured_reports_error() {
        let events = collect(pipeline_with(ModelSet::new("none", None)), "hi", "none").await;
        assert!(matches!(events[0], StreamEvent::Metadata { .. }));
        assert!(events
            .iter()
            .any(|e| matches!(e, StreamEvent::Error { text } if text.contains("No chat models"))));
        assert!(matches!(events.last(), Some(StreamEvent::Done)));
    }

    #[tokio::test]
    async fn test_automation_intent_reports_action_and_result() {
        let mut models = ModelSet::new("test", None);
        models.insert(Arc::new(ScriptedModel::from_deltas("test", &["Sure."])));
        let events = collect(pipeline_with(models), "schedule a zoom meeting", "test").await;

        assert!(events.iter().any(|e| matches!(
            e,
            StreamEvent::McpAction { service, action }
                if service == "zoom" && action == "create_meeting"
        )));
        // Empty registry: the router reports a structured failure, and the
        // turn still closes normally.
        assert!(events.iter().any(|e| matches!(
            e,
            StreamEvent::McpResult { result, .. } if !result.success
        )));
        assert!(matches!(events.last(), Some(StreamEvent::Done)));
    }
}
