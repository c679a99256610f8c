//! Scripted Model
//!
//! In-memory `ChatModel` double: replays a fixed chunk script, or refuses
//! to connect. Used by the pipeline and integration tests to exercise
//! ordering, fallback, and error paths without a provider.

use async_trait::async_trait;
use tokio::sync::mpsc;

use relay_core::{CoreError, CoreResult};

use super::{ChatModel, ModelChunk};

/// Replays a fixed script of chunks.
pub struct ScriptedModel {
    name: String,
    script: Vec<ModelChunk>,
    connect_error: Option<String>,
}

impl ScriptedModel {
    /// Model that streams the given chunks in order.
    pub fn new(name: impl Into<String>, script: Vec<ModelChunk>) -> Self {
        Self {
            name: name.into(),
            script,
            connect_error: None,
        }
    }

    /// Model whose connection always fails, for fallback tests.
    pub fn failing(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Vec::new(),
            connect_error: Some(error.into()),
        }
    }

    /// Convenience: a script of plain text deltas.
    pub fn from_deltas(name: impl Into<String>, deltas: &[&str]) -> Self {
        Self::new(
            name,
            deltas.iter().map(|d| ModelChunk::Delta(d.to_string())).collect(),
        )
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream_reply(&self, _message: &str) -> CoreResult<mpsc::Receiver<CoreResult<ModelChunk>>> {
        if let Some(error) = &self.connect_error {
            return Err(CoreError::network(error.clone()));
        }
        let (tx, rx) = mpsc::channel(16);
        let script = self.script.clone();
        tokio::spawn(async move {
            for chunk in script {
                if tx.send(Ok(chunk)).await.is_err() {
                    return;
                }
            }
        });
        Ok(rx)
    }
}
