//! align-synth - group alignment summary service
//!
//! Collects structured interviews for a group and, on an admin's request,
//! synthesizes them into one alignment summary with a hosted language model.

use align_common::config::{
    database_path, load_toml_config_or_default, resolve_root_folder, ROOT_FOLDER_ENV,
};
use align_common::db::init_database;
use align_synth::config::{openai_config, resolve_api_key, DEFAULT_PORT};
use align_synth::llm::OpenAiClient;
use align_synth::synthesis::SummaryGenerator;
use align_synth::{build_router, AppState};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "align-synth", version, about = "Group alignment summary service")]
struct Args {
    /// Data folder holding alignment.db
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// HTTP listen port
    #[arg(long, env = "ALIGN_PORT")]
    port: Option<u16>,

    /// HTTP bind address
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting align-synth v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let toml_config = load_toml_config_or_default(args.config.as_deref())
        .context("Failed to load configuration file")?;

    let env_root = std::env::var(ROOT_FOLDER_ENV).ok();
    let root_folder = resolve_root_folder(args.root_folder.as_deref(), env_root.as_deref(), &toml_config);
    let db_path = database_path(&root_folder);
    info!("Database: {}", db_path.display());

    let pool = match init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Database ready");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let api_key = resolve_api_key(&pool, &toml_config).await?;
    let client = OpenAiClient::new(openai_config(api_key, &toml_config))
        .context("Failed to build model client")?;
    let generator = SummaryGenerator::new(Arc::new(client));
    info!("Summary model: {}", generator.model_name());

    let state = AppState::new(pool, generator);
    let app = build_router(state);

    let port = args.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let addr = format!("{}:{}", args.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("align-synth listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
