//! Agent Execute Endpoint
//!
//! `POST /api/agent/execute`: one task in, one `ExecutionResult` out. The
//! body is taken as loose JSON so a malformed task can be answered with the
//! same result shape instead of a framework-generated rejection. Status is
//! 200 for success, 400 for any failure; the body shape never varies.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use relay_core::{ExecutionResult, Task};

use crate::state::AppState;

pub async fn execute(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<ExecutionResult>) {
    let task = match parse_task(&body) {
        Some(task) => task,
        None => {
            debug!("rejecting malformed task body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ExecutionResult::failure("Malformed task object in request body.")),
            );
        }
    };

    let result = state.router.dispatch(&task).await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status, Json(result))
}

/// Pull a task out of the request body.
///
/// `type` must be a string and `params`, when present, an object. A missing
/// `id` gets a generated one; a missing `params` becomes an empty map.
fn parse_task(body: &Value) -> Option<Task> {
    let object = body.as_object()?;
    let task_type = object.get("type")?.as_str()?;

    let params: Map<String, Value> = match object.get("params") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return None,
    };

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    Some(Task {
        id,
        task_type: task_type.to_string(),
        params,
    })
}
