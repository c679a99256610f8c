//! Request Queue
//!
//! Serializes stream requests from one client session so at most one stream
//! is ever in flight. Completion of the active stream (including error,
//! which the runner reports through the event stream, not by panicking)
//! triggers dequeue-and-start of the next. No priority, no cancellation of
//! a queued request beyond simple removal.
//!
//! The queue is the single shared mutable structure per session; pushes and
//! pops are atomic with respect to the active flag because both happen
//! under the same lock.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

/// One queued stream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRequest {
    pub message: String,
    pub model: String,
}

impl StreamRequest {
    pub fn new(message: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            model: model.into(),
        }
    }
}

/// Runs the active stream for a session. `run` returns when the stream has
/// fully completed, including its error paths.
#[async_trait]
pub trait StreamRunner: Send + Sync + 'static {
    async fn run(&self, request: StreamRequest);
}

struct QueueState {
    pending: VecDeque<StreamRequest>,
    active: bool,
}

/// Per-session FIFO of stream requests.
///
/// Constructed per session and passed explicitly; there is no shared
/// global instance.
pub struct RequestQueue {
    runner: Arc<dyn StreamRunner>,
    state: Arc<Mutex<QueueState>>,
}

impl RequestQueue {
    /// Queue driving the given runner.
    pub fn new(runner: Arc<dyn StreamRunner>) -> Self {
        Self {
            runner,
            state: Arc::new(Mutex::new(QueueState {
                pending: VecDeque::new(),
                active: false,
            })),
        }
    }

    /// Append a request. Starts the drain task if no stream is in flight.
    pub async fn enqueue(&self, request: StreamRequest) {
        let start_drain = {
            let mut state = self.state.lock().await;
            state.pending.push_back(request);
            if state.active {
                false
            } else {
                state.active = true;
                true
            }
        };
        if start_drain {
            self.spawn_drain();
        }
    }

    /// Number of queued-but-not-started requests.
    pub async fn pending_len(&self) -> usize {
        self.state.lock().await.pending.len()
    }

    /// Whether a stream is currently in flight.
    pub async fn is_active(&self) -> bool {
        self.state.lock().await.active
    }

    fn spawn_drain(&self) {
        let state = Arc::clone(&self.state);
        let runner = Arc::clone(&self.runner);
        tokio::spawn(async move {
            loop {
                let next = {
                    let mut state = state.lock().await;
                    match state.pending.pop_front() {
                        Some(request) => request,
                        None => {
                            state.active = false;
                            break;
                        }
                    }
                };
                debug!(message = %next.message, "starting queued stream");
                runner.run(next).await;
            }
        });
    }
}
