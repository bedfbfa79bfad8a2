// AI matching: similarity listing and the LLM rescoring pipeline.
// Similarity ranking itself lives in the database (`get_job_matches_for_student`).

pub mod gate;
pub mod handlers;
pub mod pool;
pub mod prompts;
pub mod rescore;
pub mod retrieval;
pub mod scorer;
pub mod store;
pub mod text;

#[cfg(test)]
pub mod testing;
