//! LLM Client — the single point of entry for all completion calls in the triage gateway.
//!
//! ARCHITECTURAL RULE: No other module may call the inference provider directly.
//! All LLM interactions MUST go through the `InferenceClient` trait defined here.
//!
//! Model: llama-3.3-70b-versatile (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

pub mod prompts;

const CHAT_COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";
/// The model used for all LLM calls in the gateway.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "llama-3.3-70b-versatile";

/// Every way a completion call can fail to produce text. Callers treat all of
/// these as "inference unavailable"; the variants exist for logging.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("No inference API key configured (set GROQ_API_KEY)")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Per-call knobs passed alongside the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    pub model: &'static str,
    pub temperature: f32,
    /// Ask the provider to constrain the reply to a JSON object.
    pub structured_reply: bool,
}

impl CompletionOptions {
    pub fn structured(temperature: f32) -> Self {
        Self {
            model: MODEL,
            temperature,
            structured_reply: true,
        }
    }

    pub fn free_text(temperature: f32) -> Self {
        Self {
            model: MODEL,
            temperature,
            structured_reply: false,
        }
    }
}

/// A remote text-completion capability. Carried in `AppState` as `Arc<dyn InferenceClient>`
/// so handlers and tests never depend on the concrete provider.
///
/// Implementations make exactly one attempt per call and never interpret the returned text.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user_text: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatCompletionResponse {
    /// Extracts the text content of the first choice that carries any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .iter()
            .find_map(|c| c.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

/// Production client for the Groq OpenAI-compatible chat-completions API.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.inference_timeout)
            .build()?;

        Ok(Self {
            client,
            url: format!(
                "{}{}",
                config.groq_base_url.trim_end_matches('/'),
                CHAT_COMPLETIONS_PATH
            ),
            api_key: config.groq_api_key.clone(),
        })
    }
}

#[async_trait]
impl InferenceClient for LlmClient {
    /// Makes a single call to the chat-completions endpoint and returns the reply text.
    /// No retries: a timeout, transport error or non-2xx status is returned as-is.
    async fn complete(
        &self,
        system: &str,
        user_text: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        // Fail closed before touching the network.
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential)?;

        let request_body = ChatCompletionRequest {
            model: options.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user_text,
                },
            ],
            temperature: options.temperature,
            response_format: options.structured_reply.then_some(ResponseFormat {
                format_type: "json_object",
            }),
        };

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &completion.usage {
            debug!(
                "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .text()
            .map(str::to_owned)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// In-memory `InferenceClient` for handler and operation tests.
#[cfg(test)]
pub mod fake {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    type Responder = dyn Fn(&str) -> Result<String, LlmError> + Send + Sync;

    /// A recorded `complete` call: system prompt, user text and options.
    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub system: String,
        pub user_text: String,
        pub options: CompletionOptions,
    }

    pub struct FakeClient {
        responder: Box<Responder>,
        calls: AtomicUsize,
        recorded: Mutex<Vec<RecordedCall>>,
    }

    impl FakeClient {
        /// Answers every call by applying `f` to the user text.
        pub fn with<F>(f: F) -> Self
        where
            F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
        {
            Self {
                responder: Box::new(f),
                calls: AtomicUsize::new(0),
                recorded: Mutex::new(Vec::new()),
            }
        }

        pub fn replying(reply: &str) -> Self {
            let reply = reply.to_string();
            Self::with(move |_| Ok(reply.clone()))
        }

        pub fn failing() -> Self {
            Self::with(|_| {
                Err(LlmError::Api {
                    status: 503,
                    message: "service unavailable".to_string(),
                })
            })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn last_call(&self) -> Option<RecordedCall> {
            self.recorded.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl InferenceClient for FakeClient {
        async fn complete(
            &self,
            system: &str,
            user_text: &str,
            options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.recorded.lock().unwrap().push(RecordedCall {
                system: system.to_string(),
                user_text: user_text.to_string(),
                options: options.clone(),
            });
            // Let other in-flight requests interleave, as a real network call would.
            tokio::task::yield_now().await;
            (self.responder)(user_text)
        }
    }
}
