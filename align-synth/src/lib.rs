//! align-synth library interface
//!
//! Interview collection and alignment-summary synthesis service. Exposes the
//! router and state for the binary and for integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod interview;
pub mod llm;
pub mod synthesis;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::synthesis::{SummaryGenerator, SynthesisOrchestrator};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Synthesis pipeline entry point
    pub orchestrator: SynthesisOrchestrator,
    /// Groups with a synthesis request in progress
    pub in_flight: Arc<Mutex<HashSet<Uuid>>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, generator: SummaryGenerator) -> Self {
        Self {
            orchestrator: SynthesisOrchestrator::new(db.clone(), generator),
            db,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::interview_routes())
        .merge(api::dashboard_routes())
        .merge(api::summary_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
