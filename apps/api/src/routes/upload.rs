//! Multipart handling for `POST /analyze`.
//!
//! Each accepted file is written to a `NamedTempFile`. The handler owns those
//! guards, so the files are removed when it returns, whichever way it returns.

use std::path::Path;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::Config;
use crate::errors::AppError;
use crate::extraction::SUPPORTED_EXTENSIONS;

pub const RESUME_FIELD: &str = "resume";
pub const JOB_DESCRIPTION_FIELD: &str = "jobDescription";
pub const PROVIDER_FIELD: &str = "aiProvider";

/// An uploaded document parked on disk for the duration of one request.
#[derive(Debug)]
pub struct UploadedDocument {
    file: NamedTempFile,
    pub original_name: String,
}

impl UploadedDocument {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[derive(Debug, Default)]
pub struct AnalyzeUpload {
    pub resume: Option<UploadedDocument>,
    pub job_description: Option<UploadedDocument>,
    pub ai_provider: Option<String>,
}

/// Reads the known fields; unknown fields are drained and ignored.
pub async fn read_analyze_upload(
    multipart: &mut Multipart,
    config: &Config,
) -> Result<AnalyzeUpload, AppError> {
    let mut upload = AnalyzeUpload::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            RESUME_FIELD => upload.resume = Some(persist_field(field, config).await?),
            JOB_DESCRIPTION_FIELD => {
                upload.job_description = Some(persist_field(field, config).await?)
            }
            PROVIDER_FIELD => {
                let value = field.text().await.map_err(multipart_error)?;
                let value = value.trim();
                if !value.is_empty() {
                    upload.ai_provider = Some(value.to_string());
                }
            }
            _ => {
                field.bytes().await.map_err(multipart_error)?;
            }
        }
    }

    Ok(upload)
}

async fn persist_field(field: Field<'_>, config: &Config) -> Result<UploadedDocument, AppError> {
    let original_name = field
        .file_name()
        .map(str::to_owned)
        .ok_or_else(|| AppError::Validation("Uploaded documents must be files".to_string()))?;
    let extension = allowed_extension(&original_name)?;

    let bytes = field.bytes().await.map_err(multipart_error)?;
    if bytes.len() > config.max_upload_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "'{original_name}' exceeds the {} MB upload limit",
            config.max_upload_bytes / (1024 * 1024)
        )));
    }

    let file = tempfile::Builder::new()
        .prefix("upload-")
        .suffix(&format!(".{extension}"))
        .tempfile_in(&config.upload_dir)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to create temp file: {e}")))?;
    tokio::fs::write(file.path(), &bytes)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to write upload: {e}")))?;

    debug!(file = %original_name, bytes = bytes.len(), "Stored upload");
    Ok(UploadedDocument {
        file,
        original_name,
    })
}

/// Lowercase extension of `file_name` if it is on the allow-list.
pub fn allowed_extension(file_name: &str) -> Result<String, AppError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(AppError::Validation(format!(
            "Unsupported file type for '{file_name}'. Only PDF, DOCX, DOC, and TXT files are allowed"
        )))
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}
