// All LLM prompt constants for the job details module.

/// System prompt for job-details drafting. Paired with `JSON_ONLY_SYSTEM`.
pub const JOB_DETAILS_SYSTEM: &str = "You are an experienced recruiter writing job postings \
    for students and OJT (on-the-job training) candidates. Write clear, specific, \
    entry-level friendly content.";

/// Job-details prompt template. Replace `{job_title}` and `{brief}` before sending.
pub const JOB_DETAILS_PROMPT_TEMPLATE: &str = r#"Draft the details of a job posting.

JOB TITLE: {job_title}
EMPLOYER NOTES: {brief}

Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "Two or three sentences describing the role.",
  "responsibilities": ["..."],
  "must_haves": ["..."],
  "nice_to_haves": ["..."],
  "perks": ["..."],
  "tags": ["short lowercase skill or category tags"]
}

Rules:
- 3 to 6 items per list, except tags (3 to 8).
- Do not invent salary figures or company names.
- If the employer notes are empty, base the content on the job title alone."#;
