//! Axum route handlers for the AI job details API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::job_details::generator::{generate_job_details, JobDetailsOutcome};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JobDetailsRequest {
    pub job_title: String,
    #[serde(default)]
    pub brief: Option<String>,
}

/// POST /api/ai/job-details
///
/// Drafts structured posting details. Replies the model did not format as
/// the expected JSON come back as `{"status": "unparseable", "raw": ...}`.
pub async fn handle_job_details(
    State(state): State<AppState>,
    Json(request): Json<JobDetailsRequest>,
) -> Result<Json<JobDetailsOutcome>, AppError> {
    let job_title = request.job_title.trim();
    if job_title.is_empty() {
        return Err(AppError::Validation("job_title cannot be empty".to_string()));
    }

    let brief = request.brief.as_deref().unwrap_or("").trim();
    let outcome = generate_job_details(state.llm.as_ref(), job_title, brief).await?;
    Ok(Json(outcome))
}
