//! Risk assessment — grades an incident report against the risk rubric.
//!
//! Flow: rubric prompt → single structured LLM call → strict decode → validate range.
//! Any failure along the way yields the fixed fallback; this operation never errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::llm_client::{strip_json_fences, CompletionOptions, InferenceClient, LlmError};
use crate::triage::incident::IncidentText;
use crate::triage::prompts::risk_assessment_system_prompt;

/// Low temperature so the model sticks to the rubric.
const ASSESSMENT_TEMPERATURE: f32 = 0.1;

pub const FALLBACK_RISK_SCORE: f64 = 0.5;
pub const FALLBACK_SAFETY_TIP: &str = "AI Service Unavailable. Stay Alert.";

/// Structured risk grade returned by `/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskAssessment {
    /// 0.0 – 1.0
    pub risk_score: f64,
    pub safety_tip: String,
}

impl RiskAssessment {
    /// Returned whenever the model cannot be reached or its reply is unusable.
    pub fn fallback() -> Self {
        Self {
            risk_score: FALLBACK_RISK_SCORE,
            safety_tip: FALLBACK_SAFETY_TIP.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AssessmentError {
    #[error("inference unavailable: {0}")]
    Inference(#[from] LlmError),

    #[error("malformed reply: {0}")]
    MalformedReply(String),
}

/// Decodes and validates a model reply.
///
/// Accepts exactly `{"risk_score": <number in [0,1]>, "safety_tip": <non-blank string>}`,
/// optionally wrapped in a markdown code fence. The score is never clamped or adjusted.
pub fn parse_assessment(reply: &str) -> Result<RiskAssessment, AssessmentError> {
    let value: Value = serde_json::from_str(strip_json_fences(reply))
        .map_err(|e| AssessmentError::MalformedReply(e.to_string()))?;

    // The derived Deserialize also accepts a sequence; only an object is a record.
    if !value.is_object() {
        return Err(AssessmentError::MalformedReply(
            "reply is not a JSON object".to_string(),
        ));
    }

    let assessment = RiskAssessment::deserialize(value)
        .map_err(|e| AssessmentError::MalformedReply(e.to_string()))?;

    if !assessment.risk_score.is_finite() || !(0.0..=1.0).contains(&assessment.risk_score) {
        return Err(AssessmentError::MalformedReply(format!(
            "risk_score {} outside [0, 1]",
            assessment.risk_score
        )));
    }

    if assessment.safety_tip.trim().is_empty() {
        return Err(AssessmentError::MalformedReply(
            "safety_tip is empty".to_string(),
        ));
    }

    Ok(assessment)
}

/// The fallible half of the pipeline: one LLM call plus strict decoding.
pub async fn try_assess_risk(
    text: &IncidentText,
    llm: &dyn InferenceClient,
) -> Result<RiskAssessment, AssessmentError> {
    let reply = llm
        .complete(
            &risk_assessment_system_prompt(),
            text.as_str(),
            &CompletionOptions::structured(ASSESSMENT_TEMPERATURE),
        )
        .await?;

    parse_assessment(&reply)
}

/// Grades an incident report. Always returns a usable assessment.
pub async fn assess_risk(text: &IncidentText, llm: &dyn InferenceClient) -> RiskAssessment {
    info!("Analyzing report: {}", text.as_str());

    match try_assess_risk(text, llm).await {
        Ok(assessment) => {
            info!(
                "Analysis succeeded: risk_score={} safety_tip={:?}",
                assessment.risk_score, assessment.safety_tip
            );
            assessment
        }
        Err(e) => {
            warn!("Analysis failed, returning fallback: {e}");
            RiskAssessment::fallback()
        }
    }
}
