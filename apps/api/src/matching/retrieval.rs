//! Match listing — ranked similarity matches enriched with posting and employer fields.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::store::MatchStore;
use crate::models::matching::{JobSummaryRow, MatchCandidate};

#[derive(Debug, Clone, Serialize)]
pub struct JobMatchListing {
    pub job_id: Uuid,
    pub similarity: f64,
    pub match_score: f64,
    pub job_title: Option<String>,
    pub location: Option<String>,
    pub work_type: Option<String>,
    pub status: Option<String>,
    pub company_name: Option<String>,
    pub company_logo: Option<String>,
}

impl JobMatchListing {
    fn new(candidate: &MatchCandidate, summary: JobSummaryRow) -> Self {
        Self {
            job_id: candidate.job_id,
            similarity: candidate.similarity,
            match_score: candidate.match_score(),
            job_title: summary.job_title,
            location: summary.location,
            work_type: summary.work_type,
            status: summary.status,
            company_name: summary.company_name,
            company_logo: summary.company_logo,
        }
    }
}

/// Returns the student's matches in rank order, dropping postings that are
/// paused, archived or gone.
pub async fn list_job_matches(
    store: &dyn MatchStore,
    student_id: Uuid,
) -> Result<Vec<JobMatchListing>, AppError> {
    let candidates = store.ranked_matches(student_id).await?;
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = candidates.iter().map(|c| c.job_id).collect();
    let mut summaries: HashMap<Uuid, JobSummaryRow> = store
        .job_summaries(&ids)
        .await?
        .into_iter()
        .map(|row| (row.id, row))
        .collect();

    let listings: Vec<JobMatchListing> = candidates
        .iter()
        .filter_map(|c| {
            summaries
                .remove(&c.job_id)
                .filter(JobSummaryRow::is_listed)
                .map(|summary| JobMatchListing::new(c, summary))
        })
        .collect();

    debug!(
        "Listing {} of {} matches for student {student_id}",
        listings.len(),
        candidates.len()
    );
    Ok(listings)
}
