// Prompt constants for the matching module.

/// System prompt for job-fit scoring. Paired with `NUMBER_ONLY_SYSTEM`.
pub const FIT_SCORE_SYSTEM: &str = "You are a strict technical recruiter evaluating how well \
    a student or OJT candidate fits a job posting. Score the fit from 0 (no fit) to 100 \
    (perfect fit) based only on the information provided.";

/// Scoring prompt template. Replace `{student_text}` and `{job_text}` before sending.
pub const FIT_SCORE_PROMPT_TEMPLATE: &str = r#"CANDIDATE PROFILE:
{student_text}

JOB POSTING:
{job_text}

How well does this candidate fit this job? Reply with a single integer between 0 and 100."#;
