//! In-memory doubles for the matching seams. Test builds only.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use crate::llm_client::{ChatCompletion, LlmError};
use crate::matching::scorer::{JobScorer, ScoreError};
use crate::matching::store::MatchStore;
use crate::models::matching::{JobMatchRecord, JobSummaryRow, MatchCandidate, RescoreUsage};

#[derive(Default)]
pub struct MemoryStore {
    ranked: Mutex<HashMap<Uuid, Vec<MatchCandidate>>>,
    profiles: Mutex<HashMap<Uuid, Value>>,
    jobs: Mutex<HashMap<Uuid, Value>>,
    summaries: Mutex<HashMap<Uuid, JobSummaryRow>>,
    usage: Mutex<HashMap<Uuid, DateTime<Utc>>>,
    records: Mutex<HashMap<(Uuid, Uuid), JobMatchRecord>>,
    failing_upserts: Mutex<Vec<Uuid>>,
    usage_lookup_fails: AtomicBool,
    usage_reads_stale: AtomicBool,
    job_fetches: AtomicUsize,
    ranked_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn set_ranked(&self, student_id: Uuid, matches: &[(Uuid, f64)]) {
        let candidates = matches
            .iter()
            .map(|(job_id, similarity)| MatchCandidate {
                student_id,
                job_id: *job_id,
                similarity: *similarity,
            })
            .collect();
        self.ranked.lock().unwrap().insert(student_id, candidates);
    }

    pub fn add_profile(&self, student_id: Uuid, profile: Value) {
        self.profiles.lock().unwrap().insert(student_id, profile);
    }

    pub fn add_job(&self, job_id: Uuid, job: Value) {
        self.jobs.lock().unwrap().insert(job_id, job);
    }

    pub fn add_summary(&self, job_id: Uuid, title: &str, status: &str) {
        self.summaries.lock().unwrap().insert(
            job_id,
            JobSummaryRow {
                id: job_id,
                job_title: Some(title.to_string()),
                location: Some("Cebu City".to_string()),
                work_type: Some("onsite".to_string()),
                status: Some(status.to_string()),
                company_name: Some("Acme".to_string()),
                company_logo: None,
            },
        );
    }

    pub fn set_usage(&self, student_id: Uuid, at: DateTime<Utc>) {
        self.usage.lock().unwrap().insert(student_id, at);
    }

    pub fn usage_of(&self, student_id: Uuid) -> Option<DateTime<Utc>> {
        self.usage.lock().unwrap().get(&student_id).copied()
    }

    pub fn insert_record(
        &self,
        student_id: Uuid,
        job_id: Uuid,
        similarity: f64,
        gpt_score: Option<i32>,
        at: DateTime<Utc>,
    ) {
        let candidate = MatchCandidate {
            student_id,
            job_id,
            similarity,
        };
        self.records.lock().unwrap().insert(
            (student_id, job_id),
            JobMatchRecord::from_candidate(&candidate, gpt_score, at),
        );
    }

    pub fn record(&self, student_id: Uuid, job_id: Uuid) -> Option<JobMatchRecord> {
        self.records
            .lock()
            .unwrap()
            .get(&(student_id, job_id))
            .cloned()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn fail_usage_lookup(&self) {
        self.usage_lookup_fails.store(true, Ordering::SeqCst);
    }

    /// Usage lookups report "never run" while claims still see the real row,
    /// as when another request claims the slot between read and write.
    pub fn stale_usage_reads(&self) {
        self.usage_reads_stale.store(true, Ordering::SeqCst);
    }

    pub fn fail_upsert_for(&self, job_id: Uuid) {
        self.failing_upserts.lock().unwrap().push(job_id);
    }

    pub fn job_fetches(&self) -> usize {
        self.job_fetches.load(Ordering::SeqCst)
    }

    pub fn ranked_calls(&self) -> usize {
        self.ranked_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn ranked_matches(&self, student_id: Uuid) -> Result<Vec<MatchCandidate>, sqlx::Error> {
        self.ranked_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .ranked
            .lock()
            .unwrap()
            .get(&student_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn student_profile(&self, student_id: Uuid) -> Result<Option<Value>, sqlx::Error> {
        Ok(self.profiles.lock().unwrap().get(&student_id).cloned())
    }

    async fn job_posting(&self, job_id: Uuid) -> Result<Option<Value>, sqlx::Error> {
        self.job_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.jobs.lock().unwrap().get(&job_id).cloned())
    }

    async fn job_summaries(&self, job_ids: &[Uuid]) -> Result<Vec<JobSummaryRow>, sqlx::Error> {
        let summaries = self.summaries.lock().unwrap();
        Ok(job_ids
            .iter()
            .filter_map(|id| summaries.get(id).cloned())
            .collect())
    }

    async fn rescore_usage(&self, student_id: Uuid) -> Result<Option<RescoreUsage>, sqlx::Error> {
        if self.usage_lookup_fails.load(Ordering::SeqCst) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        if self.usage_reads_stale.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.usage_of(student_id).map(|last_used_at| RescoreUsage {
            student_id,
            last_used_at,
        }))
    }

    async fn claim_rescore_usage(
        &self,
        student_id: Uuid,
        at: DateTime<Utc>,
        stale_before: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let mut usage = self.usage.lock().unwrap();
        match usage.get(&student_id) {
            Some(last) if *last > stale_before => Ok(false),
            _ => {
                usage.insert(student_id, at);
                Ok(true)
            }
        }
    }

    async fn upsert_job_match(&self, record: &JobMatchRecord) -> Result<(), sqlx::Error> {
        if self.failing_upserts.lock().unwrap().contains(&record.job_id) {
            return Err(sqlx::Error::PoolTimedOut);
        }
        self.records
            .lock()
            .unwrap()
            .insert((record.student_id, record.job_id), record.clone());
        Ok(())
    }

    async fn matches_scored_since(
        &self,
        student_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<JobMatchRecord>, sqlx::Error> {
        let mut rows: Vec<JobMatchRecord> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.student_id == student_id && r.last_scored_at >= since)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        Ok(rows)
    }
}

/// Scorer double: fixed score, optional latency (global or per job-text marker),
/// optional failure on a job-text marker.
pub struct StubScorer {
    score: i32,
    delay: Option<Duration>,
    marker_delays: Vec<(String, Duration)>,
    fail_marker: Option<String>,
    completed: Mutex<Vec<String>>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubScorer {
    pub fn scoring(score: i32) -> Self {
        Self {
            score,
            delay: None,
            marker_delays: Vec::new(),
            fail_marker: None,
            completed: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Latency for job texts containing `marker`; overrides `with_delay`.
    pub fn with_delay_for(mut self, marker: &str, delay: Duration) -> Self {
        self.marker_delays.push((marker.to_string(), delay));
        self
    }

    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Job texts in the order their scoring calls finished.
    pub fn completion_order(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobScorer for StubScorer {
    async fn score(&self, _student_text: &str, job_text: &str) -> Result<i32, ScoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = self
            .marker_delays
            .iter()
            .find(|(marker, _)| job_text.contains(marker.as_str()))
            .map(|(_, delay)| *delay)
            .or(self.delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(job_text.to_string());

        match &self.fail_marker {
            Some(marker) if job_text.contains(marker.as_str()) => {
                Err(ScoreError::NonNumeric("not sure".to_string()))
            }
            _ => Ok(self.score),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
}

/// Chat-completion double returning one canned reply (or API failure) for every call.
pub struct CannedCompletion {
    reply: Result<String, u16>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl CannedCompletion {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for CannedCompletion {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
            temperature,
        });
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Api {
                status: *status,
                message: "canned failure".to_string(),
            }),
        }
    }
}
