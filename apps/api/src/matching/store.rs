//! Persistence seam for the matching pipeline.
//!
//! `PgMatchStore` talks to the hosted Postgres database; handler and pipeline
//! code only ever sees `Arc<dyn MatchStore>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::matching::{JobMatchRecord, JobSummaryRow, MatchCandidate, RescoreUsage};

#[async_trait]
pub trait MatchStore: Send + Sync {
    /// Ranked (job_id, similarity) pairs from `get_job_matches_for_student`.
    async fn ranked_matches(&self, student_id: Uuid) -> Result<Vec<MatchCandidate>, sqlx::Error>;

    /// The student's profile row as loosely-typed JSON.
    async fn student_profile(&self, student_id: Uuid) -> Result<Option<Value>, sqlx::Error>;

    /// A single job posting row as loosely-typed JSON.
    async fn job_posting(&self, job_id: Uuid) -> Result<Option<Value>, sqlx::Error>;

    async fn job_summaries(&self, job_ids: &[Uuid]) -> Result<Vec<JobSummaryRow>, sqlx::Error>;

    async fn rescore_usage(&self, student_id: Uuid) -> Result<Option<RescoreUsage>, sqlx::Error>;

    /// Sets `last_used_at = at` only if there is no usage row yet or the stored
    /// one is at or before `stale_before`. Returns whether this call won the slot.
    async fn claim_rescore_usage(
        &self,
        student_id: Uuid,
        at: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error>;

    /// Insert-or-overwrite keyed on (student_id, job_id).
    async fn upsert_job_match(&self, record: &JobMatchRecord) -> Result<(), sqlx::Error>;

    async fn matches_scored_since(
        &self,
        student_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<JobMatchRecord>, sqlx::Error>;
}

pub struct PgMatchStore {
    pool: PgPool,
}

impl PgMatchStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MatchStore for PgMatchStore {
    async fn ranked_matches(&self, student_id: Uuid) -> Result<Vec<MatchCandidate>, sqlx::Error> {
        sqlx::query_as::<_, MatchCandidate>(
            r#"
            SELECT $1::uuid AS student_id, m.job_id, m.similarity::float8 AS similarity
            FROM get_job_matches_for_student($1) AS m
            "#,
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn student_profile(&self, student_id: Uuid) -> Result<Option<Value>, sqlx::Error> {
        sqlx::query_scalar::<_, Value>(
            "SELECT to_jsonb(sp) FROM student_profile sp WHERE sp.student_id = $1 LIMIT 1",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn job_posting(&self, job_id: Uuid) -> Result<Option<Value>, sqlx::Error> {
        sqlx::query_scalar::<_, Value>("SELECT to_jsonb(j) FROM job_postings j WHERE j.id = $1")
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn job_summaries(&self, job_ids: &[Uuid]) -> Result<Vec<JobSummaryRow>, sqlx::Error> {
        sqlx::query_as::<_, JobSummaryRow>(
            r#"
            SELECT j.id, j.job_title, j.location, j.work_type, j.status,
                   e.company_name, e.company_logo_image_path AS company_logo
            FROM job_postings j
            LEFT JOIN employers e ON e.id = j.employer_id
            WHERE j.id = ANY($1)
            "#,
        )
        .bind(job_ids)
        .fetch_all(&self.pool)
        .await
    }

    async fn rescore_usage(&self, student_id: Uuid) -> Result<Option<RescoreUsage>, sqlx::Error> {
        sqlx::query_as::<_, RescoreUsage>(
            "SELECT student_id, last_used_at FROM rescore_usage WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn claim_rescore_usage(
        &self,
        student_id: Uuid,
        at: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let claimed = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO rescore_usage (student_id, last_used_at)
            VALUES ($1, $2)
            ON CONFLICT (student_id) DO UPDATE SET last_used_at = EXCLUDED.last_used_at
            WHERE rescore_usage.last_used_at <= $3
            RETURNING student_id
            "#,
        )
        .bind(student_id)
        .bind(at)
        .bind(stale_before)
        .fetch_optional(&self.pool)
        .await?;
        Ok(claimed.is_some())
    }

    async fn upsert_job_match(&self, record: &JobMatchRecord) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO job_matches
                (student_id, job_id, match_score, raw_similarity, gpt_score, last_scored_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (student_id, job_id) DO UPDATE SET
                match_score = EXCLUDED.match_score,
                raw_similarity = EXCLUDED.raw_similarity,
                gpt_score = EXCLUDED.gpt_score,
                last_scored_at = EXCLUDED.last_scored_at
            "#,
        )
        .bind(record.student_id)
        .bind(record.job_id)
        .bind(record.match_score)
        .bind(record.raw_similarity)
        .bind(record.gpt_score)
        .bind(record.last_scored_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn matches_scored_since(
        &self,
        student_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<JobMatchRecord>, sqlx::Error> {
        sqlx::query_as::<_, JobMatchRecord>(
            r#"
            SELECT student_id, job_id, match_score, raw_similarity, gpt_score, last_scored_at
            FROM job_matches
            WHERE student_id = $1 AND last_scored_at >= $2
            ORDER BY match_score DESC
            "#,
        )
        .bind(student_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
    }
}
