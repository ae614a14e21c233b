use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::Config;
use crate::humanize::orchestrator::JobOrchestrator;
use crate::humanize::remote::{RemoteClient, RemoteError};
use crate::humanize::transformer::{LocalTransformer, RemoteTransformer, Transformer};
use crate::notifications::ToastBus;
use crate::session::SessionStore;
use crate::storage::KeyValueStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionStore,
    /// Owned here and cloned into every component that raises toasts.
    pub toasts: ToastBus,
    pub orchestrator: Arc<JobOrchestrator>,
    pub remote: RemoteClient,
}

impl AppState {
    /// Production wiring: webhook transformer with engine fallback, or the
    /// engine alone when no webhook URL is configured.
    pub fn new(config: &Config, kv: Arc<dyn KeyValueStore>) -> Result<Self, RemoteError> {
        let session = SessionStore::new(kv);
        let remote = RemoteClient::new(&config.webhook_base_url)?;
        let transformer: Arc<dyn Transformer> = if config.webhook_enabled() {
            Arc::new(RemoteTransformer::new(remote.clone(), session.clone()))
        } else {
            info!("No webhook URL configured, humanizing with the local engine");
            Arc::new(LocalTransformer)
        };
        Ok(Self::with_transformer(
            config.processing_delay,
            session,
            remote,
            transformer,
        ))
    }

    pub fn with_transformer(
        processing_delay: Duration,
        session: SessionStore,
        remote: RemoteClient,
        transformer: Arc<dyn Transformer>,
    ) -> Self {
        let toasts = ToastBus::new();
        let orchestrator = Arc::new(JobOrchestrator::new(
            session.clone(),
            toasts.clone(),
            transformer,
            processing_delay,
        ));
        AppState {
            session,
            toasts,
            orchestrator,
            remote,
        }
    }
}
