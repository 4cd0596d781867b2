//! Rephrase — rewrites an informal or mixed-language report into clear, urgent English.
//!
//! On failure the caller's own text is handed back untouched: a degraded report
//! is more useful than none.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::llm_client::{CompletionOptions, InferenceClient};
use crate::triage::incident::IncidentText;
use crate::triage::prompts::rephrase_system_prompt;

const REPHRASE_TEMPERATURE: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RephraseResult {
    pub rephrased_text: String,
}

/// Trims the reply and removes every quote character models like to wrap output in.
/// Returns `None` when nothing is left.
pub fn clean_rephrased(reply: &str) -> Option<String> {
    let cleaned: String = reply
        .trim()
        .chars()
        .filter(|c| !matches!(c, '"' | '\''))
        .collect();
    // Stripping a leading quote can expose whitespace.
    let cleaned = cleaned.trim();

    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Rewrites an incident report. Always returns non-empty text.
pub async fn rephrase(text: &IncidentText, llm: &dyn InferenceClient) -> RephraseResult {
    info!("Rephrasing text: {}", text.as_str());

    let reply = llm
        .complete(
            &rephrase_system_prompt(),
            text.as_str(),
            &CompletionOptions::free_text(REPHRASE_TEMPERATURE),
        )
        .await;

    let rephrased_text = match reply {
        Ok(reply) => match clean_rephrased(&reply) {
            Some(cleaned) => {
                info!("Rephrased result: {cleaned}");
                cleaned
            }
            None => {
                warn!("Rephrase reply was empty after cleanup, returning original text");
                text.as_str().to_string()
            }
        },
        Err(e) => {
            warn!("Rephrase failed, returning original text: {e}");
            text.as_str().to_string()
        }
    };

    RephraseResult { rephrased_text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::FakeClient;

    const HINGLISH: &str = "Bhai koi ganda admi mera picha krra h raat se";
    const ENGLISH: &str = "A suspicious individual has been following me since last night.";

    fn incident(text: &str) -> IncidentText {
        IncidentText::parse(Some(text.to_string())).unwrap()
    }

    #[test]
    fn test_clean_strips_wrapping_quotes_and_whitespace() {
        assert_eq!(
            clean_rephrased("  \"Someone is following me.\"\n").as_deref(),
            Some("Someone is following me.")
        );
    }

    #[test]
    fn test_clean_removes_quotes_anywhere() {
        assert_eq!(
            clean_rephrased("The man's car didn't stop, he said \"come here\".").as_deref(),
            Some("The mans car didnt stop, he said come here.")
        );
    }

    #[test]
    fn test_clean_rejects_quote_only_reply() {
        assert_eq!(clean_rephrased(" \"\" ' "), None);
        assert_eq!(clean_rephrased(""), None);
    }

    #[tokio::test]
    async fn test_hinglish_example_is_rewritten() {
        let llm = FakeClient::replying(&format!("\"{ENGLISH}\""));
        let result = rephrase(&incident(HINGLISH), &llm).await;

        assert_eq!(result.rephrased_text, ENGLISH);
        assert!(result.rephrased_text.contains("following me"));
    }

    #[tokio::test]
    async fn test_inference_failure_returns_original_unmodified() {
        let original = "  koi 'ajeeb' banda gate pe khada hai  ";
        let llm = FakeClient::failing();
        let result = rephrase(&incident(original), &llm).await;

        assert_eq!(result.rephrased_text, original);
        assert_eq!(llm.calls(), 1, "no retries");
    }

    #[tokio::test]
    async fn test_empty_reply_returns_original() {
        let llm = FakeClient::replying("   \"\"  ");
        let result = rephrase(&incident(HINGLISH), &llm).await;
        assert_eq!(result.rephrased_text, HINGLISH);
    }

    #[tokio::test]
    async fn test_successful_reply_is_nonempty_and_quote_free() {
        let llm = FakeClient::replying("'Someone is \"watching\" my house.'");
        let result = rephrase(&incident("koi ghar dekh raha hai"), &llm).await;

        assert!(!result.rephrased_text.is_empty());
        assert!(!result.rephrased_text.contains('"'));
        assert!(!result.rephrased_text.contains('\''));
    }

    #[tokio::test]
    async fn test_call_uses_free_text_mode_and_moderate_temperature() {
        let llm = FakeClient::replying(ENGLISH);
        rephrase(&incident(HINGLISH), &llm).await;

        let call = llm.last_call().unwrap();
        assert_eq!(call.user_text, HINGLISH);
        assert_eq!(call.system, rephrase_system_prompt());
        assert!(!call.options.structured_reply);
        assert!((call.options.temperature - 0.3).abs() < f32::EPSILON);
    }
}
