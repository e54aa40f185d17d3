//! OpenAICompletionAgent - Direct REST client for the OpenAI Chat Completions API.
//!
//! Credentials: ~/.config/aidkit/secret.json > environment variables.
//! A missing key does not prevent startup; every completion then fails with
//! an external-service error and the fallback path answers with its
//! "service unavailable" message.

use aidkit_core::config::CompletionConfig;
use aidkit_core::error::{AidError, Result};
use aidkit_core::fallback::{Completer, CompletionRequest};
use aidkit_infrastructure::storage::load_default_secrets;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const SERVICE: &str = "completion";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Completion client that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAICompletionAgent {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenAICompletionAgent {
    /// Creates an agent with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: Some(api_key.into()),
            model: model.into(),
            base_url: CompletionConfig::default().base_url,
        }
    }

    /// Builds the agent for `config`, resolving credentials from
    /// ~/.config/aidkit/secret.json or the environment.
    ///
    /// Priority:
    /// 1. ~/.config/aidkit/secret.json
    /// 2. Environment variables (OPENAI_API_KEY, OPENAI_MODEL_NAME)
    ///
    /// The model falls back to `config.model` when neither source names one.
    pub fn from_config(config: &CompletionConfig) -> Self {
        let (api_key, model) = match Self::resolve_credentials() {
            Some((api_key, model)) => (Some(api_key), model),
            None => {
                tracing::warn!(
                    "OPENAI_API_KEY not found in secret.json or environment; generative fallback disabled"
                );
                (None, None)
            }
        };

        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
            model: model.unwrap_or_else(|| config.model.clone()),
            base_url: config.base_url.clone(),
        }
    }

    fn resolve_credentials() -> Option<(String, Option<String>)> {
        match load_default_secrets() {
            Ok(Some(secrets)) => {
                if let Some(openai) = secrets.openai {
                    return Some((openai.api_key, openai.model_name));
                }
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "Ignoring unreadable secrets file"),
        }

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())?;
        Some((api_key, env::var("OPENAI_MODEL_NAME").ok()))
    }

    /// Overrides the endpoint, e.g. for a proxy or a compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_persona.clone(),
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt.clone(),
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }

    async fn send_request(&self, api_key: &str, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| AidError::external(SERVICE, format!("OpenAI API request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            AidError::external(SERVICE, format!("Failed to parse OpenAI response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Completer for OpenAICompletionAgent {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AidError::external(SERVICE, "OpenAI API key is not configured"))?;

        let body = self.build_request(request);
        tracing::debug!(model = %self.model, "Requesting completion");
        self.send_request(api_key, &body).await
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| AidError::external(SERVICE, "OpenAI API returned no content in the response"))
}

fn map_http_error(status: StatusCode, body: &str) -> AidError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    AidError::external(SERVICE, format!("OpenAI API returned {status}: {message}"))
}
