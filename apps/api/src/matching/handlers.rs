//! Axum route handlers for the AI matches API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::rescore::{rescore_student, RescoreSettings, ScoredMatch};
use crate::matching::retrieval::{list_job_matches, JobMatchListing};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct MatchJobsRequest {
    pub student_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct MatchJobsResponse {
    pub matches: Vec<JobMatchListing>,
}

#[derive(Debug, Deserialize)]
pub struct RescoreRequest {
    pub student_id: Option<Uuid>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RescoreResponse {
    pub ok: bool,
    pub cached: bool,
    pub results: Vec<ScoredMatch>,
}

fn require_student_id(student_id: Option<Uuid>) -> Result<Uuid, AppError> {
    student_id.ok_or_else(|| AppError::Validation("student_id is required".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/ai-matches/match/jobs
///
/// Ranked matches for a student, enriched with job/company fields.
pub async fn handle_match_jobs(
    State(state): State<AppState>,
    Json(request): Json<MatchJobsRequest>,
) -> Result<Json<MatchJobsResponse>, AppError> {
    let student_id = require_student_id(request.student_id)?;
    let matches = list_job_matches(state.store.as_ref(), student_id).await?;
    Ok(Json(MatchJobsResponse { matches }))
}

/// POST /api/ai-matches/rescore
///
/// LLM-rescoring of the student's top N matches, served from cache inside the cooldown.
pub async fn handle_rescore(
    State(state): State<AppState>,
    Json(request): Json<RescoreRequest>,
) -> Result<Json<RescoreResponse>, AppError> {
    let student_id = require_student_id(request.student_id)?;
    let top_n = request.top_n.unwrap_or(state.config.rescore_default_top_n);
    if top_n == 0 {
        return Err(AppError::Validation("top_n must be at least 1".to_string()));
    }

    let outcome = rescore_student(
        state.store.clone(),
        state.scorer.clone(),
        RescoreSettings::from_config(&state.config),
        student_id,
        top_n,
    )
    .await?;

    Ok(Json(RescoreResponse {
        ok: true,
        cached: outcome.cached,
        results: outcome.results,
    }))
}
