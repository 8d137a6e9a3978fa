use std::sync::Arc;

use anyhow::Context;
use fs_agent_server::api::{AppState, create_router};
use fs_agent_server::config::{DEFAULT_CONFIG_PATH, ServerConfig};
use system_capabilities::FileSystemCapabilities;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    info!("starting fs-agent server");
    let config = ServerConfig::load_or_default(DEFAULT_CONFIG_PATH)
        .with_context(|| format!("failed to load server config from {DEFAULT_CONFIG_PATH}"))?;

    let root = config.resolve_root()?;
    let filesystem = FileSystemCapabilities::new(&root, config.walk_options())
        .with_context(|| format!("failed to open root directory {}", root.display()))?;
    let state = Arc::new(AppState::new(filesystem));
    info!(root = %state.filesystem.root().display(), "serving filesystem root");

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(address = %listener.local_addr()?, "agent running, press Ctrl+C to shut down");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with an error")?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutdown signal received, stopping server");
}

fn init_tracing() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}
