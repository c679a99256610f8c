//! End-to-end tests over a live gateway: real axum server on an ephemeral
//! port, scripted models instead of providers, and the real client crate
//! consuming the stream.

use std::sync::Arc;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use relay_client::{ChatStreamClient, IncrementalRenderer, RenderUpdate};
use relay_core::StreamEvent;
use relay_gateway::{build_router, AppState, GatewayConfig};
use relay_tools::{CodeExecutor, TaskRouter, ToolRegistry, WebFetcher, ZapierMcpTool};
use relay_gateway::llm::{ModelSet, ScriptedModel};

/// Start a gateway with the builtin tools and the given models; returns its
/// base URL.
async fn spawn_gateway(models: ModelSet) -> String {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(CodeExecutor::stub())).unwrap();
    registry.register(Arc::new(WebFetcher::new())).unwrap();
    registry.register(Arc::new(ZapierMcpTool::new())).unwrap();

    let state = Arc::new(AppState::from_parts(
        GatewayConfig::default(),
        Arc::new(TaskRouter::new(Arc::new(registry))),
        Arc::new(models),
    ));
    let app = build_router(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn scripted(deltas: &[&str]) -> ModelSet {
    let mut models = ModelSet::new("test", None);
    models.insert(Arc::new(ScriptedModel::from_deltas("test", deltas)));
    models
}

async fn collect_stream(base: &str, message: &str, model: &str) -> Vec<StreamEvent> {
    let client = ChatStreamClient::new(format!("{base}/api/stream"));
    let mut rx = client.stream(message, model).await.unwrap();
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

// ── Agent execute endpoint ──────────────────────────────────────────────

#[tokio::test]
async fn test_execute_valid_task_returns_200_with_result() {
    let base = spawn_gateway(scripted(&[])).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/agent/execute"))
        .json(&json!({
            "id": "t1",
            "type": "code_execution",
            "params": {"code": "print('hi')"}
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["output"], json!("Mock output from Python execution."));
}

#[tokio::test]
async fn test_execute_unknown_type_returns_400_routing_failure() {
    let base = spawn_gateway(scripted(&[])).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/agent/execute"))
        .json(&json!({"id": "t2", "type": "teleport", "params": {}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["error"],
        json!("No tool available to handle task type: teleport")
    );
    assert_eq!(body["details"]["taskId"], json!("t2"));
}

#[tokio::test]
async fn test_execute_invalid_params_returns_400_with_details() {
    let base = spawn_gateway(scripted(&[])).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/agent/execute"))
        .json(&json!({"id": "t3", "type": "web_fetch", "params": {"url": "not a url"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["details"]["problematicParam"], json!("url"));
    assert_eq!(body["details"]["taskId"], json!("t3"));
}

#[tokio::test]
async fn test_execute_malformed_body_returns_400() {
    let base = spawn_gateway(scripted(&[])).await;

    // `type` missing entirely.
    let response = reqwest::Client::new()
        .post(format!("{base}/api/agent/execute"))
        .json(&json!({"params": {"code": "x"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], json!("Malformed task object in request body."));
}

// ── Streaming endpoint ──────────────────────────────────────────────────

#[tokio::test]
async fn test_stream_orders_metadata_content_done() {
    let base = spawn_gateway(scripted(&["Hel", "lo", " world"])).await;
    let events = collect_stream(&base, "say hello", "test").await;

    assert!(matches!(events[0], StreamEvent::Metadata { .. }));
    assert_eq!(*events.last().unwrap(), StreamEvent::Done);

    // Cumulative snapshots, ending with the full message.
    let snapshots: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Content { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(snapshots, vec!["Hel", "Hello", "Hello world"]);
}

#[tokio::test]
async fn test_stream_snapshots_render_as_appends() {
    let base = spawn_gateway(scripted(&["Hi", " there"])).await;
    let events = collect_stream(&base, "greet me", "test").await;

    let mut renderer = IncrementalRenderer::new();
    let mut rendered = String::new();
    for event in &events {
        if let StreamEvent::Content { text, .. } = event {
            match renderer.apply_content(text) {
                RenderUpdate::Append(tail) => rendered.push_str(&tail),
                RenderUpdate::Reset(full) => rendered = full,
            }
        }
    }
    assert_eq!(rendered, "Hi there");
}

#[tokio::test]
async fn test_stream_empty_message_is_rejected() {
    let base = spawn_gateway(scripted(&["unused"])).await;

    let client = ChatStreamClient::new(format!("{base}/api/stream"));
    let err = client.stream("   ", "test").await.unwrap_err();
    assert!(err.to_string().contains("API error: 400"));
}

#[tokio::test]
async fn test_stream_falls_back_when_primary_refuses() {
    let mut models = ModelSet::new("primary", Some("backup".to_string()));
    models.insert(Arc::new(ScriptedModel::failing("primary", "refused")));
    models.insert(Arc::new(ScriptedModel::from_deltas("backup", &["ok"])));
    let base = spawn_gateway(models).await;

    let events = collect_stream(&base, "anything", "primary").await;

    assert!(events.iter().any(|e| matches!(
        e,
        StreamEvent::Status { text } if text.contains("falling back to backup")
    )));
    assert!(events.iter().any(|e| matches!(
        e,
        StreamEvent::Content { model_used: Some(m), .. } if m == "backup"
    )));
    assert_eq!(*events.last().unwrap(), StreamEvent::Done);
}

#[tokio::test]
async fn test_stream_automation_intent_reports_action_and_result() {
    let base = spawn_gateway(scripted(&["On it."])).await;
    let events = collect_stream(&base, "schedule a zoom meeting for friday", "test").await;

    assert!(events.iter().any(|e| matches!(
        e,
        StreamEvent::McpAction { service, action }
            if service == "zoom" && action == "create_meeting"
    )));

    // No MCP endpoint configured: the action fails structured, the turn
    // still closes with done.
    let result = events
        .iter()
        .find_map(|e| match e {
            StreamEvent::McpResult { result, .. } => Some(result),
            _ => None,
        })
        .expect("mcp_result event");
    assert!(!result.success);
    assert_eq!(*events.last().unwrap(), StreamEvent::Done);
}

#[tokio::test]
async fn test_health_endpoint() {
    let base = spawn_gateway(scripted(&[])).await;
    let response = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
}
