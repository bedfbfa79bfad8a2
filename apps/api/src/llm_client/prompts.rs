// Shared prompt fragments and the prompt-building helpers used across services.
// Each feature that needs LLM calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt fragment that enforces a bare integer reply.
pub const NUMBER_ONLY_SYSTEM: &str = "Respond with ONLY a single integer. \
    Do NOT include words, units, percent signs or explanations.";

/// Fills `{name}` placeholders in a prompt template.
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}
