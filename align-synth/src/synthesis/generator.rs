//! Summary generator
//!
//! Sends the prompt to the model with a strict JSON-schema output constraint
//! and deserializes the answer into an [`AlignmentSummary`]. One attempt, no
//! retry. Any output that is not exactly the ten string sections is rejected.

use align_common::db::{InterviewRecord, Profile};
use align_common::AlignmentSummary;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error};
use uuid::Uuid;

use super::prompt::{build_prompt, SummaryPrompt};
use super::SynthesisError;
use crate::llm::{ChatModel, ChatRequest, JsonSchemaFormat, LlmError};

/// Schema name sent with the structured-output constraint
pub const SUMMARY_SCHEMA_NAME: &str = "alignment_summary";

/// Produces alignment summaries through an injected model
#[derive(Clone)]
pub struct SummaryGenerator {
    model: Arc<dyn ChatModel>,
}

impl SummaryGenerator {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Model identifier, for logging
    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Build the prompt for `interviews` and generate a summary
    ///
    /// An empty interview list is rejected without calling the model.
    pub async fn synthesize(
        &self,
        interviews: &[InterviewRecord],
        profiles: &HashMap<Uuid, Profile>,
        previous: Option<&AlignmentSummary>,
    ) -> Result<AlignmentSummary, SynthesisError> {
        if interviews.is_empty() {
            return Err(SynthesisError::EmptyInput);
        }
        let prompt = build_prompt(interviews, profiles, previous);
        self.generate(&prompt).await
    }

    /// Send a rendered prompt and parse the structured answer
    pub async fn generate(&self, prompt: &SummaryPrompt) -> Result<AlignmentSummary, SynthesisError> {
        let request = ChatRequest {
            system: prompt.system.clone(),
            user: prompt.user.clone(),
            response_format: Some(JsonSchemaFormat {
                name: SUMMARY_SCHEMA_NAME.to_string(),
                schema: AlignmentSummary::json_schema(),
                strict: true,
            }),
        };

        let content = self.model.complete(&request).await.map_err(|e| {
            error!(model = %self.model.model_name(), "Error generating alignment summary: {}", e);
            match e {
                LlmError::MissingApiKey => SynthesisError::Configuration(e.to_string()),
                other => SynthesisError::Upstream(other.to_string()),
            }
        })?;

        debug!(chars = content.len(), "Received structured summary");

        parse_summary(&content)
    }
}

/// Decode model output into a summary
pub fn parse_summary(content: &str) -> Result<AlignmentSummary, SynthesisError> {
    if content.trim().is_empty() {
        return Err(SynthesisError::Upstream("Empty response from model".to_string()));
    }

    AlignmentSummary::from_json(content.trim()).map_err(|e| {
        error!("Model output did not match the summary schema: {}", e);
        SynthesisError::Upstream(format!("Malformed summary JSON: {}", e))
    })
}
