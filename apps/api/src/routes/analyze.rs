//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartRejection, FromRequest, Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::AnalysisResult;
use crate::errors::AppError;
use crate::providers::openai::OpenAiProvider;
use crate::routes::upload::read_analyze_upload;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// `Json` whose rejections render as `AppError` bodies.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeTextRequest {
    #[serde(default)]
    pub resume_text: String,
    #[serde(default)]
    pub job_description_text: String,
    #[serde(default)]
    pub ai_provider: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
    pub provider: String,
}

fn provider_or_default(requested: Option<String>) -> String {
    requested
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| OpenAiProvider::ID.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Multipart upload of `resume` and `jobDescription` documents plus an optional
/// `aiProvider` field. Temporary files are removed when this handler returns.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut multipart = multipart?;
    let upload = read_analyze_upload(&mut multipart, &state.config).await?;
    let provider = provider_or_default(upload.ai_provider);

    let (Some(resume), Some(job_description)) = (upload.resume, upload.job_description) else {
        return Err(AppError::Validation(
            "Both resume and job description files are required".to_string(),
        ));
    };

    let span = info_span!("analyze", request_id = %Uuid::new_v4(), provider = %provider, source = "files");
    let analysis = async {
        info!(
            resume = %resume.original_name,
            job_description = %job_description.original_name,
            "Analyzing uploaded documents"
        );
        state
            .registry
            .analyze_from_files(&provider, resume.path(), job_description.path())
            .await
    }
    .instrument(span)
    .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
        provider,
    }))
}

/// POST /analyze-text
///
/// JSON body with `resumeText`, `jobDescriptionText` and optional `aiProvider`.
/// Missing texts are treated as empty and rejected by the registry.
pub async fn handle_analyze_text(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeTextRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let provider = provider_or_default(request.ai_provider);

    let span = info_span!("analyze", request_id = %Uuid::new_v4(), provider = %provider, source = "text");
    let analysis = state
        .registry
        .analyze(
            &provider,
            &request.resume_text,
            &request.job_description_text,
        )
        .instrument(span)
        .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis,
        provider,
    }))
}
