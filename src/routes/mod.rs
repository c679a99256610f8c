//! HTTP Surface
//!
//! - `POST /api/agent/execute` - single-task dispatch (`agent`)
//! - `POST /api/stream` - streaming chat turn (`stream`)
//! - `GET /api/health` - liveness probe

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use crate::state::AppState;

pub mod agent;
pub mod stream;

/// Build the gateway router over shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/agent/execute", post(agent::execute))
        .route("/api/stream", post(stream::stream))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}
