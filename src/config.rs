//! Gateway Configuration
//!
//! Environment-derived configuration, built once in `main` and carried on
//! the request context. No module-level globals: everything a request
//! needs hangs off `AppState`.

use std::env;

/// One OpenAI-compatible model endpoint.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Selection name used by clients (e.g. "nvidia", "gemini")
    pub name: String,
    /// Base URL of the chat completions API
    pub base_url: String,
    /// Bearer token
    pub api_key: String,
    /// Provider-side model identifier
    pub model: String,
}

/// Process-lifetime gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listen address, e.g. "0.0.0.0:5000"
    pub bind_addr: String,
    /// Model used when the request names none or an unknown one
    pub default_model: String,
    /// Model tried when the selected one fails to connect
    pub fallback_model: Option<String>,
    /// Configured model endpoints
    pub models: Vec<ModelConfig>,
    /// Zapier MCP endpoint for automation actions
    pub zapier_mcp_url: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:5000".to_string(),
            default_model: "nvidia".to_string(),
            fallback_model: Some("gemini".to_string()),
            models: Vec::new(),
            zapier_mcp_url: None,
        }
    }
}

impl GatewayConfig {
    /// Build the configuration from the process environment.
    ///
    /// A provider is enabled by setting its API key; base URL and model
    /// identifier have sensible defaults per provider.
    pub fn from_env() -> Self {
        let mut config = Self {
            bind_addr: env::var("RELAY_BIND").unwrap_or_else(|_| "0.0.0.0:5000".to_string()),
            default_model: env::var("RELAY_DEFAULT_MODEL").unwrap_or_else(|_| "nvidia".to_string()),
            fallback_model: match env::var("RELAY_FALLBACK_MODEL") {
                Ok(name) if name.trim().is_empty() => None,
                Ok(name) => Some(name),
                Err(_) => Some("gemini".to_string()),
            },
            models: Vec::new(),
            zapier_mcp_url: env::var("ZAPIER_MCP_ENDPOINT_URL").ok(),
        };

        if let Some(model) = model_from_env(
            "nvidia",
            "NVIDIA",
            "https://integrate.api.nvidia.com/v1",
            "meta/llama-3.1-70b-instruct",
        ) {
            config.models.push(model);
        }
        if let Some(model) = model_from_env(
            "gemini",
            "GEMINI",
            "https://generativelanguage.googleapis.com/v1beta/openai",
            "gemini-2.0-flash",
        ) {
            config.models.push(model);
        }

        config
    }
}

fn model_from_env(name: &str, prefix: &str, default_base: &str, default_model: &str) -> Option<ModelConfig> {
    let api_key = env::var(format!("{prefix}_API_KEY")).ok()?;
    Some(ModelConfig {
        name: name.to_string(),
        base_url: env::var(format!("{prefix}_BASE_URL")).unwrap_or_else(|_| default_base.to_string()),
        api_key,
        model: env::var(format!("{prefix}_MODEL")).unwrap_or_else(|_| default_model.to_string()),
    })
}
