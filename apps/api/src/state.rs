use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ChatCompletion;
use crate::matching::scorer::JobScorer;
use crate::matching::store::MatchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Postgres-backed in production (`PgMatchStore`).
    pub store: Arc<dyn MatchStore>,
    /// Pluggable fit scorer. Default: LlmJobScorer over `llm`.
    pub scorer: Arc<dyn JobScorer>,
    pub llm: Arc<dyn ChatCompletion>,
}
