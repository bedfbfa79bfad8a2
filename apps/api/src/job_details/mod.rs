// AI-assisted job posting content: drafts structured details from a title and brief.
// All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
