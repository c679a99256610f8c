//! Builtin Tools
//!
//! The three capabilities shipped with the gateway:
//!
//! - `CodeExecutor` - runs code through a sandbox seam (`code_execution`)
//! - `WebFetcher` - bounded-timeout GET of a URL (`web_fetch`)
//! - `ZapierMcpTool` - third-party automation via an MCP endpoint
//!   (`zapier_mcp_action`)
//!
//! Each tool owns its own timeout policy; a timed-out call surfaces as a
//! normal failure result, never as an error out of `execute`.

pub mod code_executor;
pub mod web_fetcher;
pub mod zapier_mcp;

pub use code_executor::{CodeExecutor, CodeSandbox, StubSandbox};
pub use web_fetcher::WebFetcher;
pub use zapier_mcp::ZapierMcpTool;

use std::time::Duration;

/// Build a `reqwest::Client` with a bounded request timeout.
pub fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("failed to build reqwest client")
}
