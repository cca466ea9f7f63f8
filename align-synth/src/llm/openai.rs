//! OpenAI-compatible chat completions client
//!
//! # API Reference
//! - Endpoint: `{base_url}/chat/completions`
//! - Auth: `Authorization: Bearer <api key>`
//! - Structured output: `response_format = {type: "json_schema", json_schema: {name, strict, schema}}`
//!
//! The client is constructed explicitly and shared through application state.
//! A client without a key can still be built; every call then fails with
//! [`LlmError::MissingApiKey`] so the service starts without credentials.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::Duration;
use tracing::debug;

use super::{ChatModel, ChatRequest, LlmError};

/// Default provider base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model
pub const DEFAULT_MODEL: &str = "gpt-5-mini-2025-08-07";

/// Default completion token cap
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Transport timeout for one request
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client settings
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Sampling temperature; omitted from the request when None
    pub temperature: Option<f32>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }
}

/// Chat completions client
pub struct OpenAiClient {
    http_client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a client from settings
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| LlmError::Setup(e.to_string()))?;

        Ok(Self { http_client, config })
    }

    /// Whether a non-blank API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Request body for a chat request
    pub fn request_body(&self, request: &ChatRequest) -> Value {
        let mut body = Map::new();
        body.insert("model".into(), json!(self.config.model));
        body.insert(
            "messages".into(),
            json!([
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ]),
        );
        body.insert("max_completion_tokens".into(), json!(self.config.max_tokens));
        if let Some(temperature) = self.config.temperature {
            body.insert("temperature".into(), json!(temperature));
        }
        if let Some(format) = &request.response_format {
            body.insert(
                "response_format".into(),
                json!({
                    "type": "json_schema",
                    "json_schema": {
                        "name": format.name,
                        "strict": format.strict,
                        "schema": format.schema,
                    }
                }),
            );
        }
        Value::Object(body)
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let api_key = self.api_key().ok_or(LlmError::MissingApiKey)?;

        debug!(
            model = %self.config.model,
            prompt_chars = request.user.len(),
            structured = request.response_format.is_some(),
            "Sending chat completion request"
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| LlmError::Network(format!("Chat completion request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse chat completion: {}", e)))?;

        extract_content(completion)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// First choice's message content, rejecting empty or refused answers
fn extract_content(completion: ChatCompletionResponse) -> Result<String, LlmError> {
    let message = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .ok_or(LlmError::EmptyResponse)?;

    if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
        return Err(LlmError::Api { status: 200, body: format!("Model refused: {}", refusal) });
    }

    match message.content {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(LlmError::EmptyResponse),
    }
}

// ============================================================================
// Provider response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}
