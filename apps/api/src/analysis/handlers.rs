//! Axum route handlers for the Resume Analysis API.

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::keywords::extract_keywords;
use crate::analysis::{analyze, AnalysisReport};
use crate::errors::AppError;
use crate::parser::UploadedDocument;
use crate::state::AppState;

const FILE_FIELD: &str = "file";
const JD_FIELD: &str = "jobDescription";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordsRequest {
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
}

/// Fields collected from the multipart analyze form.
#[derive(Debug, Default)]
struct AnalyzeForm {
    document: Option<UploadedDocument>,
    job_description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/resume/analyze
///
/// Multipart form: `file` (PDF, DOCX or text resume) and `jobDescription` (text).
/// Extracts the resume text, then scores it against the JD keywords.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let form = read_form(multipart).await?;

    let document = form
        .document
        .filter(|d| !d.is_empty())
        .ok_or_else(|| AppError::Validation(format!("'{FILE_FIELD}' must be a non-empty file")))?;
    let job_description = form
        .job_description
        .ok_or_else(|| AppError::Validation(format!("'{JD_FIELD}' is required")))?;

    let analysis_id = Uuid::new_v4();
    let resume_text = state
        .extractor
        .extract_text(&document)
        .await
        .inspect_err(|e| {
            warn!(
                %analysis_id,
                file_name = document.file_name.as_deref().unwrap_or("<unnamed>"),
                "Resume extraction failed: {e}"
            )
        })?;

    let report = analyze(&state.vocabulary, &job_description, &resume_text);

    info!(
        %analysis_id,
        score = report.score,
        matched = report.matched_keywords.len(),
        missing = report.missing_keywords.len(),
        warnings = report.warnings.len(),
        "Resume analyzed"
    );

    Ok(Json(report))
}

/// POST /api/resume/keywords
///
/// Returns the dictionary keywords found in a job description, in extraction order.
/// Useful for previewing what a resume will be scored against.
pub async fn handle_keywords(
    State(state): State<AppState>,
    Json(request): Json<KeywordsRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let keywords = extract_keywords(&request.job_description, &state.vocabulary)
        .into_iter()
        .collect();
    Ok(Json(KeywordsResponse { keywords }))
}

// ────────────────────────────────────────────────────────────────────────────
// Multipart parsing
// ────────────────────────────────────────────────────────────────────────────

async fn read_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        let name = field.name().map(String::from);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let file_name = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = read_field_bytes(field).await?;
                form.document = Some(UploadedDocument {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            Some(JD_FIELD) => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| multipart_error(&format!("'{JD_FIELD}' must be UTF-8 text"), e))?;
                form.job_description = Some(text);
            }
            // unknown fields are ignored
            _ => {}
        }
    }

    Ok(form)
}

async fn read_field_bytes(field: Field<'_>) -> Result<Bytes, AppError> {
    field
        .bytes()
        .await
        .map_err(|e| multipart_error(&format!("Failed to read '{FILE_FIELD}'"), e))
}

/// Keeps axum's own status for the failure: an over-limit body is a 413, anything
/// else the client sent wrong is a 400.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {e}"))
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}
