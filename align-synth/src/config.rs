//! Configuration resolution for align-synth
//!
//! Model API key priority: Database → ENV → TOML. The service starts without a
//! key; synthesis requests then fail with a configuration error.

use align_common::config::TomlConfig;
use align_common::Result;
use sqlx::{Pool, Sqlite};
use tracing::{info, warn};

use crate::llm::openai::{OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

/// Environment variable holding the model API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5780;

/// Where a resolved key came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Database,
    Environment,
    Toml,
}

/// Pick the highest-priority non-blank key
///
/// Warns when more than one source is set.
pub fn select_api_key(
    db_key: Option<String>,
    env_key: Option<String>,
    toml_key: Option<String>,
) -> Option<(String, KeySource)> {
    let candidates: Vec<(String, KeySource)> = [
        (db_key, KeySource::Database),
        (env_key, KeySource::Environment),
        (toml_key, KeySource::Toml),
    ]
    .into_iter()
    .filter_map(|(key, source)| key.filter(|k| is_valid_key(k)).map(|k| (k, source)))
    .collect();

    if candidates.len() > 1 {
        let sources: Vec<String> = candidates.iter().map(|(_, s)| format!("{:?}", s)).collect();
        warn!(
            "Model API key found in multiple sources: {}. Using {:?} (highest priority).",
            sources.join(", "),
            candidates[0].1
        );
    }

    candidates.into_iter().next()
}

/// Resolve the model API key from database, environment and TOML
pub async fn resolve_api_key(db: &Pool<Sqlite>, toml_config: &TomlConfig) -> Result<Option<String>> {
    let db_key = crate::db::settings::get_openai_api_key(db).await?;
    let env_key = std::env::var(API_KEY_ENV).ok();
    let toml_key = toml_config.llm.api_key.clone();

    match select_api_key(db_key, env_key, toml_key) {
        Some((key, source)) => {
            info!("Model API key loaded from {:?}", source);
            Ok(Some(key))
        }
        None => {
            warn!(
                "Model API key not configured. Set {} or [llm] api_key in config.toml; \
                 synthesis requests will fail until then.",
                API_KEY_ENV
            );
            Ok(None)
        }
    }
}

/// Client settings from the TOML `[llm]` table plus a resolved key
pub fn openai_config(api_key: Option<String>, toml_config: &TomlConfig) -> OpenAiConfig {
    let llm = &toml_config.llm;
    OpenAiConfig {
        api_key,
        base_url: llm.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        model: llm.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        max_tokens: llm.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        temperature: llm.temperature,
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}
