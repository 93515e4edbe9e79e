//! OpenAI-compatible Chat Completions client.
//!
//! All API-backed boundary implementations share this client. It speaks the
//! plain Chat Completions REST shape and knows nothing about tutoring;
//! prompting lives in the individual boundary implementations.
//! Configuration priority: ~/.config/sage/secret.json > environment variables

use crate::config::load_secret_config;
use reqwest::header::{HeaderValue, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use sage_core::{Result, SageError};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_MODEL: &str = "gpt-4o";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// A single message in a Chat Completions request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Client for an OpenAI-compatible Chat Completions endpoint.
#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: Option<u32>,
}

impl ChatClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens: None,
        }
    }

    /// Loads configuration from ~/.config/sage/secret.json or environment variables.
    ///
    /// Priority:
    /// 1. ~/.config/sage/secret.json
    /// 2. Environment variables (SAGE_API_KEY, SAGE_MODEL_NAME)
    ///
    /// Model name defaults to `gpt-4o` if not specified.
    pub fn try_from_env() -> Result<Self> {
        // Try loading from the secret file first
        if let Ok(secret_config) = load_secret_config() {
            if let Some(openai_config) = secret_config.openai {
                let model = openai_config
                    .model_name
                    .unwrap_or_else(|| DEFAULT_MODEL.into());
                let mut client = Self::new(openai_config.api_key, model);
                if let Some(base_url) = openai_config.base_url {
                    client.base_url = base_url;
                }
                return Ok(client);
            }
        }

        // Fallback to environment variables
        let api_key = env::var("SAGE_API_KEY").map_err(|_| {
            SageError::config(
                "SAGE_API_KEY not found in ~/.config/sage/secret.json or environment variables",
            )
        })?;

        let model = env::var("SAGE_MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.into());
        Ok(Self::new(api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the maximum number of tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Sends a completion request and returns the reply text.
    ///
    /// # Arguments
    ///
    /// * `messages` - Full message list, system prompt included
    /// * `json_mode` - Whether to request a strict JSON object response
    pub async fn complete(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String> {
        if messages.is_empty() {
            return Err(SageError::internal("Chat request must include messages"));
        }

        tracing::debug!(
            target: "chat_client",
            "Sending {} messages to {} (json_mode={})",
            messages.len(),
            self.model,
            json_mode
        );

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            max_tokens: self.max_tokens,
            response_format: json_mode.then(|| ResponseFormat {
                r#type: "json_object".to_string(),
            }),
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|err| SageError::Transport {
                status_code: None,
                message: format!("Chat API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
                retry_after: None,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get(RETRY_AFTER));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read API error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            SageError::transport(format!("Failed to parse chat API response: {err}"))
        })?;

        extract_text_response(parsed)
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: String,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: String,
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
        .ok_or_else(|| SageError::transport("Chat API returned no content in the response"))
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> SageError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    SageError::transport_http(
        status.as_u16(),
        format!("Chat API returned {status}: {message}"),
        is_retryable,
        retry_after,
    )
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    // Retry-After HTTP-date form is not supported.
    None
}
