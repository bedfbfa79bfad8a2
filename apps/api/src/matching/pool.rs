//! Bounded scoring pool.
//!
//! A fixed number of worker tasks drain one shared queue. Each worker takes a
//! candidate, fetches the posting, scores it and upserts the record before it
//! takes the next one, so at most `concurrency` LLM calls are in flight.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::matching::scorer::JobScorer;
use crate::matching::store::MatchStore;
use crate::matching::text::build_job_text;
use crate::models::matching::{JobMatchRecord, MatchCandidate};

/// Everything one worker needs; cloned into each task.
#[derive(Clone)]
pub struct ScoringContext {
    pub store: Arc<dyn MatchStore>,
    pub scorer: Arc<dyn JobScorer>,
    pub student_text: Arc<str>,
}

type RankedOutcome = (usize, Result<Option<JobMatchRecord>, sqlx::Error>);

/// Scores every candidate with `concurrency` workers and returns the upserted
/// records in the candidates' original order.
///
/// Scorer failures are downgraded to `gpt_score: None`. Database failures do
/// not stop the other workers; once the queue is drained the first one (by
/// rank) is returned.
pub async fn score_candidates(
    ctx: ScoringContext,
    candidates: Vec<MatchCandidate>,
    concurrency: usize,
) -> Result<Vec<JobMatchRecord>, AppError> {
    let queue: Arc<Mutex<VecDeque<(usize, MatchCandidate)>>> =
        Arc::new(Mutex::new(candidates.into_iter().enumerate().collect()));

    let mut workers = JoinSet::new();
    for worker_id in 0..concurrency.max(1) {
        let queue = Arc::clone(&queue);
        let ctx = ctx.clone();
        workers.spawn(async move {
            let mut done: Vec<RankedOutcome> = Vec::new();
            loop {
                let next = queue.lock().await.pop_front();
                let Some((rank, candidate)) = next else {
                    break;
                };
                debug!("worker {worker_id} scoring job {}", candidate.job_id);
                done.push((rank, score_one(&ctx, candidate).await));
            }
            done
        });
    }

    let mut outcomes: Vec<RankedOutcome> = Vec::new();
    while let Some(joined) = workers.join_next().await {
        let done = joined
            .map_err(|e| AppError::Internal(anyhow::anyhow!("scoring worker failed: {e}")))?;
        outcomes.extend(done);
    }
    outcomes.sort_by_key(|(rank, _)| *rank);

    let mut records = Vec::with_capacity(outcomes.len());
    for (_, outcome) in outcomes {
        if let Some(record) = outcome? {
            records.push(record);
        }
    }
    Ok(records)
}

async fn score_one(
    ctx: &ScoringContext,
    candidate: MatchCandidate,
) -> Result<Option<JobMatchRecord>, sqlx::Error> {
    let Some(job) = ctx.store.job_posting(candidate.job_id).await? else {
        warn!("Job {} returned by matcher no longer exists, skipping", candidate.job_id);
        return Ok(None);
    };

    let job_text = build_job_text(&job);
    let gpt_score = match ctx.scorer.score(&ctx.student_text, &job_text).await {
        Ok(score) => Some(score),
        Err(e) => {
            warn!(
                "Scoring failed for student {} job {}: {e}",
                candidate.student_id, candidate.job_id
            );
            None
        }
    };

    let record = JobMatchRecord::from_candidate(&candidate, gpt_score, Utc::now());
    ctx.store.upsert_job_match(&record).await?;
    Ok(Some(record))
}
