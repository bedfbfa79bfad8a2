//! Profile / job text builders.
//!
//! Both take a loosely-typed row (`serde_json::Value`) and flatten the named
//! fields into one whitespace-normalized block. Missing or null fields become
//! empty strings; no shape is rejected.

use serde_json::Value;

/// Student profile fields fed to the scorer, in order.
pub const PROFILE_FIELDS: &[&str] = &[
    "introduction",
    "skills",
    "experiences",
    "certs",
    "portfolio",
    "resume_text",
];

/// Job posting fields fed to the scorer, in order.
pub const JOB_FIELDS: &[&str] = &["job_title", "job_description", "qualifications", "tags"];

pub fn build_profile_text(profile: &Value) -> String {
    build_text(profile, PROFILE_FIELDS)
}

pub fn build_job_text(job: &Value) -> String {
    build_text(job, JOB_FIELDS)
}

fn build_text(record: &Value, fields: &[&str]) -> String {
    let joined = fields
        .iter()
        .map(|field| record.get(*field).map(flatten_value).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_whitespace(&joined)
}

/// Strings as-is, arrays joined with ", ", objects as compact JSON, null as "".
fn flatten_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(flatten_value)
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
