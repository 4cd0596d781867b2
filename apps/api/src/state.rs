use std::sync::Arc;

use crate::llm_client::InferenceClient;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds nothing mutable: requests never share data beyond the inference client itself.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable inference backend. Production: `LlmClient`; tests swap in a fake.
    pub llm: Arc<dyn InferenceClient>,
}
