//! Job details drafting with a strict-parse-then-fallback reply policy.
//!
//! The model reply is parsed exactly once (after fence stripping). A reply
//! that is not the expected JSON is returned as `Unparseable` with the raw
//! text; it is never patched up.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::job_details::prompts::{JOB_DETAILS_PROMPT_TEMPLATE, JOB_DETAILS_SYSTEM};
use crate::llm_client::prompts::{render_template, JSON_ONLY_SYSTEM};
use crate::llm_client::{parse_json_reply, ChatCompletion};

const DRAFT_TEMPERATURE: f32 = 0.4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDetailsDraft {
    pub summary: String,
    pub responsibilities: Vec<String>,
    pub must_haves: Vec<String>,
    pub nice_to_haves: Vec<String>,
    pub perks: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobDetailsOutcome {
    Parsed { details: JobDetailsDraft },
    Unparseable { raw: String },
}

/// Classifies a model reply. Tags are lowercased and deduplicated on success.
pub fn interpret_reply(reply: &str) -> JobDetailsOutcome {
    match parse_json_reply::<JobDetailsDraft>(reply) {
        Ok(mut details) => {
            details.tags = normalize_tags(details.tags);
            JobDetailsOutcome::Parsed { details }
        }
        Err(e) => {
            warn!("Job details reply is not valid JSON for the schema: {e}");
            JobDetailsOutcome::Unparseable {
                raw: reply.to_string(),
            }
        }
    }
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

pub async fn generate_job_details(
    llm: &dyn ChatCompletion,
    job_title: &str,
    brief: &str,
) -> Result<JobDetailsOutcome, AppError> {
    let system = format!("{JOB_DETAILS_SYSTEM} {JSON_ONLY_SYSTEM}");
    let prompt = render_template(
        JOB_DETAILS_PROMPT_TEMPLATE,
        &[("job_title", job_title), ("brief", brief)],
    );

    let reply = llm
        .complete(&system, &prompt, DRAFT_TEMPERATURE)
        .await
        .map_err(|e| AppError::Llm(format!("Job details generation failed: {e}")))?;

    let outcome = interpret_reply(&reply);
    if let JobDetailsOutcome::Parsed { details } = &outcome {
        info!(
            "Drafted job details for '{job_title}': {} responsibilities, {} tags",
            details.responsibilities.len(),
            details.tags.len()
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::testing::CannedCompletion;

    const VALID_REPLY: &str = r#"```json
{
  "summary": "Support the web team building internal dashboards.",
  "responsibilities": ["Build React components", "Write API tests"],
  "must_haves": ["Basic JavaScript"],
  "nice_to_haves": ["TypeScript"],
  "perks": ["Allowance"],
  "tags": ["React", " react ", "Frontend", ""]
}
```"#;

    #[test]
    fn test_fenced_valid_json_parses() {
        match interpret_reply(VALID_REPLY) {
            JobDetailsOutcome::Parsed { details } => {
                assert_eq!(details.responsibilities.len(), 2);
                assert_eq!(details.tags, vec!["react", "frontend"]);
            }
            other => panic!("expected parsed, got {other:?}"),
        }
    }

    #[test]
    fn test_prose_reply_is_unparseable() {
        let reply = "Sure! Here are the details: summary - a great role";
        assert_eq!(
            interpret_reply(reply),
            JobDetailsOutcome::Unparseable {
                raw: reply.to_string()
            }
        );
    }

    #[test]
    fn test_malformed_json_is_not_repaired() {
        let reply = r#"{"summary": "x", "responsibilities": ["a",], "must_haves": [],
            "nice_to_haves": [], "perks": [], "tags": []}"#;
        assert!(matches!(
            interpret_reply(reply),
            JobDetailsOutcome::Unparseable { .. }
        ));
    }

    #[test]
    fn test_missing_field_is_unparseable() {
        let reply = r#"{"summary": "x", "responsibilities": []}"#;
        assert!(matches!(
            interpret_reply(reply),
            JobDetailsOutcome::Unparseable { .. }
        ));
    }

    #[test]
    fn test_outcome_serializes_with_status_tag() {
        let value = serde_json::to_value(JobDetailsOutcome::Unparseable {
            raw: "nope".to_string(),
        })
        .unwrap();
        assert_eq!(value["status"], "unparseable");
        assert_eq!(value["raw"], "nope");
    }

    #[tokio::test]
    async fn test_generate_sends_title_and_brief() {
        let llm = CannedCompletion::replying(VALID_REPLY);
        let outcome = generate_job_details(&llm, "Web Dev Intern", "3-month OJT, hybrid")
            .await
            .unwrap();
        assert!(matches!(outcome, JobDetailsOutcome::Parsed { .. }));

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("Web Dev Intern"));
        assert!(calls[0].prompt.contains("3-month OJT, hybrid"));
        assert!(calls[0].system.contains("valid JSON only"));
    }

    #[tokio::test]
    async fn test_generate_llm_failure_is_llm_error() {
        let llm = CannedCompletion::failing(500);
        let result = generate_job_details(&llm, "Web Dev Intern", "").await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
