pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::job_details::handlers as job_details;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // AI matches
        .route("/api/ai-matches/match/jobs", post(matching::handle_match_jobs))
        .route("/api/ai-matches/rescore", post(matching::handle_rescore))
        // AI content
        .route("/api/ai/job-details", post(job_details::handle_job_details))
        .with_state(state)
}
