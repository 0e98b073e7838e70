//! Chat-completion client
//!
//! Forwards a prompt to an OpenAI-compatible `chat/completions` endpoint and
//! returns the generated text verbatim. One attempt per call.

pub mod prompts;

pub use prompts::Prompt;

use crate::config::LlmConfig;
use crate::errors::{AppError, Result};
use crate::metrics;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessageResponse>,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// Pull a human-readable message out of a failed response body
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("API request failed: {}", status.as_u16()))
}

/// Client for one chat-completion provider
#[derive(Clone)]
pub struct LlmClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    default_api_key: Option<String>,
}

impl LlmClient {
    /// Create a client from configuration
    pub fn new(config: &LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: config.endpoint().to_string(),
            model: config.model().to_string(),
            default_api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Pick the caller's credential, falling back to the configured one
    pub fn resolve_key<'a>(&'a self, supplied: Option<&'a str>) -> Result<&'a str> {
        supplied
            .filter(|k| !k.trim().is_empty())
            .or(self.default_api_key.as_deref())
            .ok_or_else(|| AppError::Validation {
                message: "An API key is required for AI analysis".to_string(),
                field: Some("apiKey".to_string()),
            })
    }

    /// Send a prompt and return the generated text unmodified
    pub async fn complete(&self, api_key: &str, prompt: &Prompt) -> Result<String> {
        let start = Instant::now();
        let result = self.send(api_key, prompt).await;
        metrics::record_llm(start.elapsed().as_secs_f64(), &self.model, result.is_ok());
        result
    }

    async fn send(&self, api_key: &str, prompt: &Prompt) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Llm {
                message: format!("LLM API request failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                model = %self.model,
                "LLM API returned an error"
            );
            return Err(AppError::Llm {
                message: error_message(status, &body),
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| AppError::Llm {
            message: format!("Failed to parse LLM response: {}", e),
        })?;

        Ok(chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }
}
