//! LLM Scorer — rates one candidate against one job on a 0 – 100 scale.
//!
//! `AppState` holds an `Arc<dyn JobScorer>`; the production backend is
//! `LlmJobScorer`, tests plug in canned scorers.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use crate::llm_client::prompts::{render_template, NUMBER_ONLY_SYSTEM};
use crate::llm_client::{ChatCompletion, LlmError};
use crate::matching::prompts::{FIT_SCORE_PROMPT_TEMPLATE, FIT_SCORE_SYSTEM};

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("LLM returned a non-numeric score: {0:?}")]
    NonNumeric(String),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

#[async_trait]
pub trait JobScorer: Send + Sync {
    /// Returns an integer in `MIN_SCORE..=MAX_SCORE`.
    async fn score(&self, student_text: &str, job_text: &str) -> Result<i32, ScoreError>;
}

pub struct LlmJobScorer {
    llm: Arc<dyn ChatCompletion>,
}

impl LlmJobScorer {
    pub fn new(llm: Arc<dyn ChatCompletion>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl JobScorer for LlmJobScorer {
    async fn score(&self, student_text: &str, job_text: &str) -> Result<i32, ScoreError> {
        let system = format!("{FIT_SCORE_SYSTEM} {NUMBER_ONLY_SYSTEM}");
        let prompt = render_template(
            FIT_SCORE_PROMPT_TEMPLATE,
            &[("student_text", student_text), ("job_text", job_text)],
        );

        let reply = self.llm.complete(&system, &prompt, 0.0).await?;
        parse_score(&reply)
    }
}

/// Extracts the first run of digits from a reply and clamps it to 0 – 100.
pub fn parse_score(reply: &str) -> Result<i32, ScoreError> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let re = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static digit regex"));

    let digits = re
        .find(reply)
        .ok_or_else(|| ScoreError::NonNumeric(reply.trim().to_string()))?
        .as_str();

    // A run too long for i64 is certainly above the ceiling.
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Ok(value.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as i32)
}
