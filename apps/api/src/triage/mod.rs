// Incident triage: risk grading and report rephrasing.
// All LLM calls go through llm_client — no direct provider calls here.

pub mod assessment;
pub mod handlers;
pub mod incident;
pub mod prompts;
pub mod rephrase;
