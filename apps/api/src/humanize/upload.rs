//! File upload: validation plus webhook text extraction with a placeholder fallback.

use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::humanize::remote::{remote_or_local, RemoteClient, Resolved};

pub const ALLOWED_EXTENSIONS: &[&str] = &[".txt", ".docx", ".pdf"];
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Rejects files over 5 MB or without an allowed extension.
pub fn validate_upload(name: &str, size: usize) -> Result<(), AppError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "File size must be less than {}MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Please select a file with one of these extensions: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }
    Ok(())
}

/// Text shown in the editor when the extraction webhook is unavailable.
pub fn placeholder_text(file_name: &str) -> String {
    format!(
        "[Mock extracted text from {file_name}]\n\n\
         This is a placeholder for the actual text that would be extracted from your \
         uploaded file. The extraction service would parse PDF, DOCX, or TXT files and \
         return the content here for humanization."
    )
}

/// Validates `file`, then asks the webhook for its text, falling back to the
/// placeholder on any webhook failure.
pub async fn extract_text(
    remote: &RemoteClient,
    file: &UploadedFile,
) -> Result<Resolved<String>, AppError> {
    validate_upload(&file.name, file.bytes.len())?;

    let job_id = Uuid::new_v4();
    let resolved = remote_or_local(
        "upload",
        async { remote.upload(file, job_id).await.map(|r| r.extracted_text) },
        || placeholder_text(&file.name),
    )
    .await;

    info!(
        "Extracted {} chars from {} ({:?})",
        resolved.value.len(),
        file.name,
        resolved.source
    );
    Ok(resolved)
}
