//! Summary synthesis pipeline
//!
//! prompt builder → generator → orchestrator. The orchestrator is the entry
//! point; the other two are usable on their own.

pub mod generator;
pub mod orchestrator;
pub mod prompt;

pub use generator::SummaryGenerator;
pub use orchestrator::SynthesisOrchestrator;
pub use prompt::{build_prompt, resolve_display_name, SummaryPrompt};

use thiserror::Error;

/// Message shown to callers for every synthesis failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to generate alignment summary";

/// Fatal synthesis failures
///
/// Persistence problems after a summary was generated are not errors; they
/// are logged and the summary is still returned.
#[derive(Debug, Error)]
pub enum SynthesisError {
    /// Caller is not an admin of the group
    #[error("Caller is not authorized to synthesize this group")]
    Unauthorized,

    /// Nothing to synthesize
    #[error("No interviews provided")]
    EmptyInput,

    /// Model credential missing
    #[error("Model not configured: {0}")]
    Configuration(String),

    /// Model call failed or returned unusable content
    #[error("Model call failed: {0}")]
    Upstream(String),
}
