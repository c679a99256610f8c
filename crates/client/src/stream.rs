//! Chat Stream Client
//!
//! Consumer side of `POST /api/stream`: sends the chat request, feeds the
//! chunked response body through the `StreamDecoder`, and forwards typed
//! events over one ordered channel. Callers iterate the channel and pattern
//! match on the event, instead of wiring per-type callbacks.
//!
//! Delivery contract: events arrive in producer order, a terminal `Done` is
//! always delivered (synthesized if the transport closed without one), and
//! a transport error becomes an `Error` event followed by `Done` rather
//! than a hung consumer.

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use serde_json::json;
use tokio::sync::mpsc;
use tracing::warn;

use relay_core::{CoreError, CoreResult, StreamDecoder, StreamEvent};

/// Channel capacity for in-flight decoded events.
const EVENT_BUFFER: usize = 32;

/// Client for one gateway's streaming endpoint.
pub struct ChatStreamClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ChatStreamClient {
    /// Client for the given `/api/stream` URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Start one stream, returning the ordered event channel.
    ///
    /// Fails only if the request itself cannot be started; once the body
    /// is open, every failure is delivered in-band as `Error` + `Done`.
    pub async fn stream(&self, message: &str, model: &str) -> CoreResult<mpsc::Receiver<StreamEvent>> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "message": message, "model": model }))
            .send()
            .await
            .map_err(|e| CoreError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::network(format!("API error: {}", status.as_u16())));
        }

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        tokio::spawn(forward_stream(response.bytes_stream(), tx));
        Ok(rx)
    }
}

/// Pump one response body into the event channel.
///
/// Factored out of `stream` so the decode/forward behavior is testable
/// without a live transport. Stops early if the receiver hangs up (the only
/// way a caller can stop consuming; there is no mid-stream cancellation).
pub(crate) async fn forward_stream<S, E>(mut body: S, tx: mpsc::Sender<StreamEvent>)
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: std::fmt::Display,
{
    let mut decoder = StreamDecoder::new();
    let mut saw_done = false;

    while let Some(chunk) = body.next().await {
        match chunk {
            Ok(bytes) => {
                for event in decoder.feed(&bytes) {
                    saw_done |= matches!(event, StreamEvent::Done);
                    if tx.send(event).await.is_err() {
                        return;
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "transport error mid-stream");
                let _ = tx
                    .send(StreamEvent::Error {
                        text: e.to_string(),
                    })
                    .await;
                let _ = tx.send(StreamEvent::Done).await;
                return;
            }
        }
    }

    for event in decoder.flush() {
        saw_done |= matches!(event, StreamEvent::Done);
        if tx.send(event).await.is_err() {
            return;
        }
    }

    // Transports sometimes close without the terminal record; the caller
    // still gets exactly one Done.
    if !saw_done {
        let _ = tx.send(StreamEvent::Done).await;
    }
}
