//! Rescore pipeline — refreshes LLM fit scores for a student's top matches.
//!
//! Flow: profile lookup → cooldown gate → ranked matches (top N) →
//!       profile text → scoring pool (fetch job, score, upsert) → results.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::AppError;
use crate::matching::gate::{check_gate, GateDecision};
use crate::matching::pool::{score_candidates, ScoringContext};
use crate::matching::scorer::JobScorer;
use crate::matching::store::MatchStore;
use crate::matching::text::build_profile_text;
use crate::models::matching::JobMatchRecord;

#[derive(Debug, Clone, Copy)]
pub struct RescoreSettings {
    pub cooldown: Duration,
    pub concurrency: usize,
}

impl RescoreSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cooldown: Duration::hours(config.rescore_cooldown_hours),
            concurrency: config.rescore_concurrency,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredMatch {
    pub job_id: Uuid,
    pub raw_similarity: f64,
    pub gpt_score: Option<i32>,
}

impl From<JobMatchRecord> for ScoredMatch {
    fn from(record: JobMatchRecord) -> Self {
        Self {
            job_id: record.job_id,
            raw_similarity: record.raw_similarity,
            gpt_score: record.gpt_score,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RescoreOutcome {
    pub cached: bool,
    pub results: Vec<ScoredMatch>,
}

pub async fn rescore_student(
    store: Arc<dyn MatchStore>,
    scorer: Arc<dyn JobScorer>,
    settings: RescoreSettings,
    student_id: Uuid,
    top_n: usize,
) -> Result<RescoreOutcome, AppError> {
    // Checked before the gate so a missing profile never burns the cooldown.
    let profile = store
        .student_profile(student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Student profile {student_id} not found")))?;

    match check_gate(store.as_ref(), student_id, Utc::now(), settings.cooldown).await? {
        GateDecision::Cached(records) => {
            return Ok(RescoreOutcome {
                cached: true,
                results: records.into_iter().map(ScoredMatch::from).collect(),
            });
        }
        GateDecision::Fresh => {}
    }

    let mut candidates = store.ranked_matches(student_id).await?;
    let available = candidates.len();
    candidates.truncate(top_n);
    info!(
        "Rescoring {} of {available} matches for student {student_id}",
        candidates.len()
    );

    let ctx = ScoringContext {
        store,
        scorer,
        student_text: Arc::from(build_profile_text(&profile)),
    };
    let records = score_candidates(ctx, candidates, settings.concurrency).await?;

    let scored = records.iter().filter(|r| r.gpt_score.is_some()).count();
    info!(
        "Rescore finished for student {student_id}: {scored}/{} scored by LLM",
        records.len()
    );

    Ok(RescoreOutcome {
        cached: false,
        results: records.into_iter().map(ScoredMatch::from).collect(),
    })
}
