use std::ops::RangeInclusive;

use anyhow::{bail, Context, Result};

/// Accepted `RESCORE_COOLDOWN_HOURS` values: one hour up to one year.
const COOLDOWN_HOURS_RANGE: RangeInclusive<i64> = 1..=24 * 365;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub llm_api_key: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub port: u16,
    pub rust_log: String,
    /// Hours a student must wait between two fresh (LLM-backed) rescore runs.
    pub rescore_cooldown_hours: i64,
    /// Number of concurrent scoring workers in the rescore pool.
    pub rescore_concurrency: usize,
    pub rescore_default_top_n: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            llm_api_key: require_env("LLM_API_KEY")?,
            llm_base_url: optional_env("LLM_BASE_URL", "https://api.openai.com/v1"),
            llm_model: optional_env("LLM_MODEL", "gpt-4o-mini"),
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
            rescore_cooldown_hours: parse_cooldown_hours(&optional_env(
                "RESCORE_COOLDOWN_HOURS",
                "24",
            ))?,
            rescore_concurrency: optional_env("RESCORE_CONCURRENCY", "3")
                .parse::<usize>()
                .context("RESCORE_CONCURRENCY must be a positive integer")?
                .max(1),
            rescore_default_top_n: optional_env("RESCORE_DEFAULT_TOP_N", "10")
                .parse::<usize>()
                .context("RESCORE_DEFAULT_TOP_N must be a positive integer")?
                .max(1),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_cooldown_hours(raw: &str) -> Result<i64> {
    let hours = raw
        .trim()
        .parse::<i64>()
        .context("RESCORE_COOLDOWN_HOURS must be an integer")?;
    if !COOLDOWN_HOURS_RANGE.contains(&hours) {
        bail!(
            "RESCORE_COOLDOWN_HOURS must be between {} and {}, got {hours}",
            COOLDOWN_HOURS_RANGE.start(),
            COOLDOWN_HOURS_RANGE.end()
        );
    }
    Ok(hours)
}

#[cfg(test)]
impl Config {
    /// Config used by handler tests; never touches the environment.
    pub fn for_tests() -> Self {
        Config {
            database_url: "postgres://localhost/seekr_test".to_string(),
            llm_api_key: "test-key".to_string(),
            llm_base_url: "http://localhost:0".to_string(),
            llm_model: "test-model".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            rescore_cooldown_hours: 24,
            rescore_concurrency: 3,
            rescore_default_top_n: 10,
        }
    }
}
