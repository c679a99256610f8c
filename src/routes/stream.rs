//! Streaming Chat Endpoint
//!
//! `POST /api/stream`: runs the chat pipeline and relays its events as a
//! newline-delimited JSON body. The pipeline produces onto a bounded
//! channel; the response body drains it, so a slow client applies
//! backpressure instead of buffering the whole turn.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::StreamExt;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::error;

use relay_core::{StreamEncoder, StreamEvent};

use crate::state::AppState;

const EVENT_BUFFER: usize = 32;

#[derive(Debug, Deserialize)]
pub struct StreamRequestBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    model: Option<String>,
}

pub async fn stream(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StreamRequestBody>,
) -> Response {
    if body.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "error": "No message provided"})),
        )
            .into_response();
    }

    let model = body
        .model
        .unwrap_or_else(|| state.config.default_model.clone());

    let (tx, rx) = mpsc::channel::<StreamEvent>(EVENT_BUFFER);
    let pipeline = state.pipeline();
    tokio::spawn(async move {
        pipeline.run(body.message, model, tx).await;
    });

    let body = Body::from_stream(
        ReceiverStream::new(rx).map(|event| Ok::<Bytes, Infallible>(Bytes::from(encode_line(&event)))),
    );

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(body)
        // Static header and status: building this response cannot fail.
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Encode one event; an encoding failure still yields a well-formed error
/// record so the frame contract holds.
fn encode_line(event: &StreamEvent) -> String {
    match StreamEncoder::encode(event) {
        Ok(line) => line,
        Err(e) => {
            error!(error = %e, "stream event failed to encode");
            "{\"type\":\"error\",\"text\":\"event encoding failed\"}\n".to_string()
        }
    }
}
