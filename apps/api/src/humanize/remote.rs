//! Outbound webhook calls and the remote-or-local fallback strategy.
//!
//! Both integration calls (humanize submission, file upload) are optional:
//! when the webhook is unreachable or misbehaves, callers degrade to a local
//! deterministic result instead of failing. That decision lives in exactly
//! one place, [`remote_or_local`].

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use reqwest::{multipart, Client};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::humanize::upload::UploadedFile;
use crate::models::job::{Degree, Tone};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Webhook returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Webhook response did not include {0}")]
    MissingField(&'static str),
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: Source,
}

/// Awaits `remote`; on any error logs it and returns `local()` instead.
pub async fn remote_or_local<T, E, F, L>(operation: &str, remote: F, local: L) -> Resolved<T>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
    L: FnOnce() -> T,
{
    match remote.await {
        Ok(value) => Resolved {
            value,
            source: Source::Remote,
        },
        Err(err) => {
            warn!("{operation} webhook failed, using local fallback: {err}");
            Resolved {
                value: local(),
                source: Source::Local,
            }
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeRequest<'a> {
    pub job_id: Uuid,
    pub input_text: &'a str,
    pub tone: Tone,
    pub degree: Degree,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeResponse {
    #[allow(dead_code)]
    pub job_id: Option<String>,
    pub status: Option<String>,
    pub output_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[allow(dead_code)]
    pub job_id: Option<String>,
    pub extracted_text: String,
}

/// Client for the webhook base URL (`WEBHOOK_BASE_URL`).
#[derive(Clone)]
pub struct RemoteClient {
    client: Client,
    base_url: String,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST {base}/humanize
    pub async fn humanize(
        &self,
        request: &HumanizeRequest<'_>,
    ) -> Result<HumanizeResponse, RemoteError> {
        let mut builder = self
            .client
            .post(format!("{}/humanize", self.base_url))
            .json(request);
        if let Some(key) = request.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = Self::check_status(builder.send().await?).await?;
        let body: HumanizeResponse = response.json().await?;
        debug!("Humanize webhook accepted job {}", request.job_id);
        Ok(body)
    }

    /// POST {base}/upload as multipart (`file`, `jobId`).
    pub async fn upload(
        &self,
        file: &UploadedFile,
        job_id: Uuid,
    ) -> Result<UploadResponse, RemoteError> {
        let mut part = multipart::Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
        if let Some(content_type) = &file.content_type {
            part = part.mime_str(content_type)?;
        }
        let form = multipart::Form::new()
            .part("file", part)
            .text("jobId", job_id.to_string());

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
