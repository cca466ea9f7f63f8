//! API key resolution against a file-backed database

use align_common::config::{database_path, LlmSection, TomlConfig};
use align_common::db::init_database;
use align_synth::config::{openai_config, resolve_api_key};
use align_synth::db::settings;

fn toml_with_key(key: &str) -> TomlConfig {
    TomlConfig {
        llm: LlmSection { api_key: Some(key.to_string()), ..Default::default() },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_database_key_survives_restart_and_wins_over_toml() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = database_path(temp_dir.path());

    let pool = init_database(&db_path).await.unwrap();
    settings::set_openai_api_key(&pool, "sk-from-db".to_string()).await.unwrap();
    pool.close().await;

    assert!(db_path.exists());

    // Reopen the same file as a restarted service would
    let pool = init_database(&db_path).await.unwrap();
    let toml = toml_with_key("sk-from-toml");
    let key = resolve_api_key(&pool, &toml).await.unwrap();
    assert_eq!(key.as_deref(), Some("sk-from-db"));

    let config = openai_config(key, &toml);
    assert_eq!(config.api_key.as_deref(), Some("sk-from-db"));
    assert_eq!(config.model, "gpt-5-mini-2025-08-07");
}

#[tokio::test]
async fn test_database_created_in_missing_root_folder() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = temp_dir.path().join("nested").join("alignment");
    let db_path = database_path(&root);

    let pool = init_database(&db_path).await.unwrap();
    assert!(db_path.exists());
    assert_eq!(settings::get_openai_api_key(&pool).await.unwrap(), None);
}
