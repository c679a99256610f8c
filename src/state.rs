//! Application State
//!
//! Everything a request handler needs, built once at startup and shared
//! behind `Arc`. Tool registration happens here, so a duplicate task type
//! fails the process before it ever serves traffic.

use std::sync::Arc;

use relay_core::CoreResult;
use relay_tools::{CodeExecutor, TaskRouter, ToolRegistry, WebFetcher, ZapierMcpTool};

use crate::chat::ChatPipeline;
use crate::config::GatewayConfig;
use crate::llm::{ModelSet, OpenAiCompatModel};

/// Shared per-process state.
pub struct AppState {
    pub config: GatewayConfig,
    pub router: Arc<TaskRouter>,
    pub models: Arc<ModelSet>,
}

impl AppState {
    /// Build the state from configuration: register the builtin tools and
    /// instantiate a provider per configured model endpoint.
    pub fn new(config: GatewayConfig) -> CoreResult<Self> {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(CodeExecutor::stub()))?;
        registry.register(Arc::new(WebFetcher::new()))?;
        registry.register(Arc::new(ZapierMcpTool::new()))?;

        let mut models = ModelSet::new(config.default_model.clone(), config.fallback_model.clone());
        for model_config in &config.models {
            models.insert(Arc::new(OpenAiCompatModel::new(model_config.clone())));
        }

        Ok(Self {
            router: Arc::new(TaskRouter::new(Arc::new(registry))),
            models: Arc::new(models),
            config,
        })
    }

    /// Assemble state from pre-built parts. Used by tests to swap in
    /// scripted models or a custom registry.
    pub fn from_parts(config: GatewayConfig, router: Arc<TaskRouter>, models: Arc<ModelSet>) -> Self {
        Self {
            config,
            router,
            models,
        }
    }

    /// A pipeline bound to this state's models and router.
    pub fn pipeline(&self) -> ChatPipeline {
        ChatPipeline::new(
            Arc::clone(&self.models),
            Arc::clone(&self.router),
            self.config.zapier_mcp_url.clone(),
        )
    }
}
