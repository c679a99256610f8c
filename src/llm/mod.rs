//! Chat Model Providers
//!
//! The model abstraction behind the streaming endpoint. A `ChatModel`
//! streams its reply as delta chunks (plus optional reasoning); the chat
//! pipeline accumulates them into the cumulative content snapshots the
//! wire protocol carries.
//!
//! - `openai_compat` - one provider speaking the OpenAI-compatible SSE
//!   chat completions format (covers both configured backends)
//! - `scripted` - in-memory test double

pub mod openai_compat;
pub mod scripted;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use relay_core::CoreResult;

pub use openai_compat::OpenAiCompatModel;
pub use scripted::ScriptedModel;

/// One streamed fragment of a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelChunk {
    /// New reply text to append
    Delta(String),
    /// Reasoning surfaced mid-turn
    Thinking(String),
}

/// A model that can stream a reply to one message.
///
/// `stream_reply` fails only when the stream cannot be started (the
/// fallback trigger); mid-stream failures arrive as `Err` items on the
/// channel.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Selection name clients use (e.g. "nvidia")
    fn name(&self) -> &str;

    /// Start streaming a reply.
    async fn stream_reply(&self, message: &str) -> CoreResult<mpsc::Receiver<CoreResult<ModelChunk>>>;
}

/// The models configured for this process, with default and fallback
/// selection.
pub struct ModelSet {
    models: HashMap<String, Arc<dyn ChatModel>>,
    default_model: String,
    fallback_model: Option<String>,
}

impl ModelSet {
    /// Empty set with selection policy.
    pub fn new(default_model: impl Into<String>, fallback_model: Option<String>) -> Self {
        Self {
            models: HashMap::new(),
            default_model: default_model.into(),
            fallback_model,
        }
    }

    /// Add a model, keyed by its selection name.
    pub fn insert(&mut self, model: Arc<dyn ChatModel>) {
        self.models.insert(model.name().to_string(), model);
    }

    /// Select the requested model, falling back to the default when the
    /// name is unknown or empty.
    pub fn select(&self, requested: &str) -> Option<Arc<dyn ChatModel>> {
        self.models
            .get(requested)
            .or_else(|| self.models.get(&self.default_model))
            .cloned()
    }

    /// The fallback model, unless it is the one that already failed.
    pub fn fallback_for(&self, failed: &str) -> Option<Arc<dyn ChatModel>> {
        let name = self.fallback_model.as_deref()?;
        if name == failed {
            return None;
        }
        self.models.get(name).cloned()
    }

    /// Whether any model is configured.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
