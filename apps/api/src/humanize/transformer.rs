//! Transformer: the pluggable step that turns a job's input into output text.
//!
//! `AppState` carries an `Arc<dyn Transformer>` through the orchestrator.
//! `RemoteTransformer` is the production default; `LocalTransformer` runs the
//! engine alone.

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::humanize::engine;
use crate::humanize::remote::{remote_or_local, HumanizeRequest, RemoteClient, RemoteError};
use crate::models::job::HumanizeOptions;
use crate::session::SessionStore;

/// Job status the webhook reports when it gave up on a job.
const WEBHOOK_FAILED: &str = "failed";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Transformation failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait Transformer: Send + Sync {
    async fn transform(
        &self,
        job_id: Uuid,
        text: &str,
        options: &HumanizeOptions,
    ) -> Result<String, TransformError>;
}

/// Engine only, no network.
pub struct LocalTransformer;

#[async_trait]
impl Transformer for LocalTransformer {
    async fn transform(
        &self,
        _job_id: Uuid,
        text: &str,
        options: &HumanizeOptions,
    ) -> Result<String, TransformError> {
        Ok(engine::transform(text, options.tone, options.degree))
    }
}

/// Sends the job to the humanize webhook and uses its output when it returns
/// one. A reply with status `failed` fails the job. Any other webhook failure,
/// or a reply without `outputText`, falls back to the local engine.
pub struct RemoteTransformer {
    remote: RemoteClient,
    session: SessionStore,
}

impl RemoteTransformer {
    pub fn new(remote: RemoteClient, session: SessionStore) -> Self {
        Self { remote, session }
    }

    fn api_key(&self, options: &HumanizeOptions) -> Option<String> {
        if !options.use_api_key {
            return None;
        }
        match self.session.api_key() {
            Ok(key) => key,
            Err(err) => {
                warn!("Could not read saved API key, sending without it: {err}");
                None
            }
        }
    }
}

#[async_trait]
impl Transformer for RemoteTransformer {
    async fn transform(
        &self,
        job_id: Uuid,
        text: &str,
        options: &HumanizeOptions,
    ) -> Result<String, TransformError> {
        let api_key = self.api_key(options);
        let request = HumanizeRequest {
            job_id,
            input_text: text,
            tone: options.tone,
            degree: options.degree,
            api_key: api_key.as_deref(),
        };

        let resolved = remote_or_local(
            "humanize",
            async {
                let reply = self.remote.humanize(&request).await?;
                if reply.status.as_deref() == Some(WEBHOOK_FAILED) {
                    return Ok(Err(TransformError::Failed(format!(
                        "webhook reported job {job_id} as failed"
                    ))));
                }
                reply
                    .output_text
                    .map(Ok)
                    .ok_or(RemoteError::MissingField("outputText"))
            },
            || Ok(engine::transform(text, options.tone, options.degree)),
        )
        .await;

        resolved.value
    }
}
