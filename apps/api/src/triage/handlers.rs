//! Axum route handlers for the triage API.
//!
//! Inference failures never surface as HTTP errors: both endpoints answer 200 with
//! either a genuine or a fallback payload. Only malformed or blank input is rejected (400).

use axum::{
    extract::{FromRequest, State},
    Json,
};
use serde::Deserialize;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::triage::assessment::{assess_risk, RiskAssessment};
use crate::triage::incident::IncidentText;
use crate::triage::rephrase::{rephrase, RephraseResult};

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

/// `Json` whose rejections (bad syntax, wrong types, missing content type) are reported
/// through the same error envelope as blank input.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Body for both endpoints. A missing `text` is reported as a validation error
/// rather than a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct TextRequest {
    pub text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<TextRequest>,
) -> Result<Json<RiskAssessment>, AppError> {
    let text = IncidentText::parse(request.text)?;

    let assessment = assess_risk(&text, state.llm.as_ref())
        .instrument(info_span!("analyze", request_id = %Uuid::new_v4()))
        .await;

    Ok(Json(assessment))
}

/// POST /rephrase
pub async fn handle_rephrase(
    State(state): State<AppState>,
    AppJson(request): AppJson<TextRequest>,
) -> Result<Json<RephraseResult>, AppError> {
    let text = IncidentText::parse(request.text)?;

    let result = rephrase(&text, state.llm.as_ref())
        .instrument(info_span!("rephrase", request_id = %Uuid::new_v4()))
        .await;

    Ok(Json(result))
}
