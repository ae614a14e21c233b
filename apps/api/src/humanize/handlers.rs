use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::humanize::remote::Source;
use crate::humanize::upload::{extract_text, UploadedFile};
use crate::models::job::{Degree, HumanizeOptions, Job, JobStatus, SourceFile, Tone};
use crate::models::plan::PlanTier;
use crate::models::toast::NewToast;
use crate::models::user::User;
use crate::session::{JobStats, SessionStore};
use crate::state::AppState;
use crate::validation::truncate_text;

/// Characters of input shown per job on the dashboard.
const PREVIEW_CHARS: usize = 100;
const RECENT_JOBS: usize = 5;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HumanizeBody {
    #[serde(default)]
    pub input_text: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub degree: Degree,
    /// Defaults to whether an API key is saved.
    pub use_api_key: Option<bool>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
}

impl HumanizeBody {
    pub fn options(&self, session: &SessionStore) -> HumanizeOptions {
        HumanizeOptions {
            tone: self.tone,
            degree: self.degree,
            use_api_key: self.use_api_key.unwrap_or_else(|| session.has_api_key()),
        }
    }
}

/// POST /api/v1/humanize
/// Waits for the job to finish. A failed transformation is a `failed` job, not an error.
pub async fn handle_humanize(
    State(state): State<AppState>,
    Json(body): Json<HumanizeBody>,
) -> Result<Json<Job>, AppError> {
    let options = body.options(&state.session);
    let source = body.file_name.map(|file_name| SourceFile {
        file_name,
        file_type: body.file_type,
    });
    let job = state
        .orchestrator
        .submit(&body.input_text, options, source)
        .await?;
    Ok(Json(job))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, AppError> {
    Ok(Json(state.session.list_jobs()?))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.session.delete_job(id)? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    state.toasts.publish(
        NewToast::success("Job deleted").with_message("The humanization job has been removed"),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/jobs/:id/rerun
pub async fn handle_rerun_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    Ok(Json(state.orchestrator.rerun_by_id(id).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPreview {
    pub id: Uuid,
    pub status: JobStatus,
    pub preview: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_preview: Option<String>,
    pub word_count: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub user: Option<User>,
    pub plan: PlanTier,
    /// `None` means unlimited.
    pub monthly_word_quota: Option<u64>,
    pub api_access: bool,
    pub stats: JobStats,
    pub recent_jobs: Vec<JobPreview>,
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    let user = state.session.current_user()?;
    let plan = user.as_ref().map(|u| u.plan).unwrap_or(PlanTier::Free);
    let stats = state.session.job_stats()?;
    let recent_jobs = state
        .session
        .list_jobs()?
        .iter()
        .take(RECENT_JOBS)
        .map(|job| JobPreview {
            id: job.id,
            status: job.status(),
            preview: truncate_text(job.input_text(), PREVIEW_CHARS),
            output_preview: job
                .output_text()
                .map(|out| truncate_text(out, PREVIEW_CHARS)),
            word_count: job.word_count(),
            created_at: job.created_at,
        })
        .collect();

    Ok(Json(DashboardResponse {
        user,
        plan,
        monthly_word_quota: plan.monthly_word_quota(),
        api_access: plan.api_access(),
        stats,
        recent_jobs,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub extracted_text: String,
    pub source: Source,
}

/// POST /api/v1/files
/// Multipart with a single `file` field.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResult>, AppError> {
    let mut file: Option<UploadedFile> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        file = Some(UploadedFile {
            name,
            content_type,
            bytes,
        });
    }
    let file = file.ok_or_else(|| AppError::Validation("Missing `file` field".to_string()))?;

    let resolved = match extract_text(&state.remote, &file).await {
        Ok(resolved) => resolved,
        Err(err) => {
            state
                .toasts
                .publish(NewToast::error("Upload failed").with_message(err.to_string()));
            return Err(err);
        }
    };
    state.toasts.publish(
        NewToast::success("File uploaded")
            .with_message(format!("Extracted text from {}", file.name)),
    );

    Ok(Json(UploadResult {
        file_name: file.name,
        file_type: file.content_type,
        extracted_text: resolved.value,
        source: resolved.source,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyResponse {
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyBody {
    pub api_key: String,
}

/// GET /api/v1/settings/api-key
pub async fn handle_get_api_key(
    State(state): State<AppState>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    Ok(Json(ApiKeyResponse {
        api_key: state.session.api_key()?,
    }))
}

/// PUT /api/v1/settings/api-key
pub async fn handle_put_api_key(
    State(state): State<AppState>,
    Json(body): Json<ApiKeyBody>,
) -> Result<Json<ApiKeyResponse>, AppError> {
    let key = body.api_key.trim();
    if key.is_empty() {
        return Err(AppError::Validation("API key cannot be empty".to_string()));
    }
    state.session.set_api_key(key)?;
    state.toasts.publish(
        NewToast::success("API key saved").with_message("Your API key has been saved securely"),
    );
    Ok(Json(ApiKeyResponse {
        api_key: Some(key.to_string()),
    }))
}

/// DELETE /api/v1/settings/api-key
pub async fn handle_delete_api_key(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.session.clear_api_key()?;
    state
        .toasts
        .publish(NewToast::info("API key removed").with_message("Using default API service"));
    Ok(StatusCode::NO_CONTENT)
}
