//! Cooldown gate — at most one fresh (LLM-backed) rescore per student per window.
//!
//! Inside the window the caller gets the rows already scored since local
//! midnight. Outside it, the usage marker is claimed *before* any scoring with
//! a conditional upsert, so of two concurrent requests only one scores; the
//! other is served the cache. A failed usage lookup fails closed.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::store::MatchStore;
use crate::models::matching::JobMatchRecord;

#[derive(Debug)]
pub enum GateDecision {
    /// Cooldown still running; serve these rows without calling the LLM.
    Cached(Vec<JobMatchRecord>),
    /// Usage marker has been refreshed; run the scoring pool.
    Fresh,
}

pub fn within_cooldown(
    last_used_at: DateTime<Utc>,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> bool {
    now - last_used_at < cooldown
}

/// Start of the calendar day containing `now`, in `now`'s timezone.
pub fn local_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

pub async fn check_gate(
    store: &dyn MatchStore,
    student_id: Uuid,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Result<GateDecision, AppError> {
    let usage = store.rescore_usage(student_id).await.map_err(|e| {
        error!("Rescore usage lookup failed for student {student_id}, refusing to score: {e}");
        AppError::Database(e)
    })?;

    if let Some(usage) = usage {
        if within_cooldown(usage.last_used_at, now, cooldown) {
            let cached = cached_since_midnight(store, student_id, now).await?;
            info!(
                "Rescore cooldown active for student {} (last run {}), serving {} cached rows",
                usage.student_id,
                usage.last_used_at,
                cached.len()
            );
            return Ok(GateDecision::Cached(cached));
        }
    }

    if !store.claim_rescore_usage(student_id, now, now - cooldown).await? {
        let cached = cached_since_midnight(store, student_id, now).await?;
        warn!(
            "Rescore slot for student {student_id} was claimed by a concurrent request, \
             serving {} cached rows",
            cached.len()
        );
        return Ok(GateDecision::Cached(cached));
    }
    Ok(GateDecision::Fresh)
}

async fn cached_since_midnight(
    store: &dyn MatchStore,
    student_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<JobMatchRecord>, AppError> {
    let since = local_midnight(&now.with_timezone(&Local));
    Ok(store.matches_scored_since(student_id, since).await?)
}
