use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One ranked row from `get_job_matches_for_student`. Transient; never stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MatchCandidate {
    pub student_id: Uuid,
    pub job_id: Uuid,
    /// Similarity in 0.0 – 1.0, computed by the database.
    pub similarity: f64,
}

impl MatchCandidate {
    /// Percentage form of the similarity persisted as `match_score`.
    pub fn match_score(&self) -> f64 {
        self.similarity * 100.0
    }
}

/// A persisted row of `job_matches`, keyed on (student_id, job_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JobMatchRecord {
    pub student_id: Uuid,
    pub job_id: Uuid,
    pub match_score: f64,
    pub raw_similarity: f64,
    /// Only ever set by a successful LLM call.
    pub gpt_score: Option<i32>,
    pub last_scored_at: DateTime<Utc>,
}

impl JobMatchRecord {
    pub fn from_candidate(
        candidate: &MatchCandidate,
        gpt_score: Option<i32>,
        scored_at: DateTime<Utc>,
    ) -> Self {
        Self {
            student_id: candidate.student_id,
            job_id: candidate.job_id,
            match_score: candidate.match_score(),
            raw_similarity: candidate.similarity,
            gpt_score,
            last_scored_at: scored_at,
        }
    }
}

/// Cooldown marker in `rescore_usage`; one row per student.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RescoreUsage {
    pub student_id: Uuid,
    pub last_used_at: DateTime<Utc>,
}

/// Listing fields of a posting joined with its employer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobSummaryRow {
    pub id: Uuid,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub status: Option<String>,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
}

impl JobSummaryRow {
    /// Paused and archived postings are hidden from students.
    pub fn is_listed(&self) -> bool {
        !matches!(
            self.status.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("paused") | Some("archived")
        )
    }
}
