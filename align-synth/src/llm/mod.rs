//! Language model access
//!
//! The pipeline talks to the model through the [`ChatModel`] trait: one system
//! message, one user message, an optional strict JSON-schema output
//! constraint, and back comes the raw text content. [`OpenAiClient`] is the
//! production implementation; tests substitute scripted models.

pub mod openai;

pub use openai::{OpenAiClient, OpenAiConfig};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Structured-output constraint attached to a chat request
#[derive(Debug, Clone, PartialEq)]
pub struct JsonSchemaFormat {
    /// Schema name reported to the model provider
    pub name: String,
    /// JSON schema the output must satisfy
    pub schema: Value,
    /// Strict mode: the provider rejects outputs that deviate from the schema
    pub strict: bool,
}

/// A single-turn chat request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub response_format: Option<JsonSchemaFormat>,
}

/// Errors from a model call
#[derive(Debug, Error)]
pub enum LlmError {
    /// No credential configured
    #[error("Missing model API key")]
    MissingApiKey,

    /// Transport-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-success status
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Provider response could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Provider returned no content
    #[error("Empty response from model")]
    EmptyResponse,

    /// HTTP client could not be built
    #[error("Client setup failed: {0}")]
    Setup(String),
}

/// One-shot chat completion
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the request and return the assistant message content
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;

    /// Model identifier, for logging
    fn model_name(&self) -> &str;
}
