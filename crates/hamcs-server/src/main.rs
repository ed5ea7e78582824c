//! hamcs-server: decision memory backend for HAMCS
//!
//! Serves the chat endpoint and the decision API on top of an in-memory
//! store. Nothing survives a restart.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use hamcs_core::InMemoryDecisionStore;
use hamcs_core::ports::SystemClock;
use hamcs_server::config::{Config, DEFAULT_LOG_FILTER};
use hamcs_server::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env を先に読む（clap の env フォールバックに反映させるため）
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Config::parse();

    let store = InMemoryDecisionStore::with_policy(config.missing_field_policy());
    let state = AppState::new(Arc::new(store), Arc::new(SystemClock));
    let app = create_router(state);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(%addr, policy = ?config.missing_field_policy(), "HAMCS backend running");
    info!("Decisions: GET /api/decisions");
    info!("Chat: POST /chat");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("HAMCS backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c");
    }
}
