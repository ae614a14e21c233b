mod config;
mod errors;
mod humanize;
mod models;
mod notifications;
mod routes;
mod session;
mod state;
mod storage;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (malformed values abort startup)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Humanizer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize session storage (one JSON file per key)
    let store = FileStore::new(config.data_dir.clone())?;
    info!("Session storage at {}", store.root().display());

    // Build app state (webhook transformer, toast bus, orchestrator)
    let state = AppState::new(&config, Arc::new(store))?;
    info!("Webhook base URL: {}", state.remote.base_url());

    let toast_log = state.toasts.subscribe(|toasts| {
        debug!("{} active notification(s)", toasts.len());
    });
    let mut job_events = state.orchestrator.subscribe();
    tokio::spawn(async move {
        loop {
            match job_events.recv().await {
                Ok(job) if job.status().is_terminal() => {
                    info!("Job {} is {}", job.id, job.status())
                }
                Ok(job) => debug!("Job {} is {}", job.id, job.status()),
                Err(RecvError::Lagged(skipped)) => debug!("Skipped {skipped} job events"),
                Err(RecvError::Closed) => break,
            }
        }
    });

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    toast_log.unsubscribe();

    Ok(())
}
