//! selfsign-server binary.

use std::sync::Arc;

use selfsign_server::{create_router, Pipeline, SignerConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("selfsign_server=info,tower_http=info")),
        )
        .init();

    let config = SignerConfig::from_env()?;
    tracing::info!(?config, "loaded configuration");

    let pipeline = Arc::new(Pipeline::new(config)?);

    let bind_addr =
        std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "selfsign-server listening");

    axum::serve(listener, create_router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("shutting down");
}
