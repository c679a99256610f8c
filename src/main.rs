//! Gateway entry point.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use relay_gateway::{build_router, AppState, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = GatewayConfig::from_env();
    if config.models.is_empty() {
        info!("no model API keys configured; chat requests will report an error");
    }

    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config)?);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "relay gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}
