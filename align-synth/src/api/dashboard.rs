//! Group dashboard and summary history endpoints

use align_common::db::{InterviewStatus, MemberRole, FULL_SUMMARY_SECTION};
use align_common::AlignmentSummary;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::Caller;
use crate::db::{groups, interviews, members, summaries};
use crate::{ApiError, ApiResult, AppState};

/// Completed interviews needed before a group is considered ready
pub const READY_THRESHOLD: i64 = 3;

const DEFAULT_HISTORY_LIMIT: i64 = 20;
const MAX_HISTORY_LIMIT: i64 = 100;

/// Dashboard view of a group
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub group_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub completed_interviews: i64,
    pub status: String,
    pub your_role: Option<MemberRole>,
    pub alignment_summary: Option<AlignmentSummary>,
    pub last_analyzed_at: Option<DateTime<Utc>>,
}

/// Readiness label for a completed-interview count
pub fn readiness_label(completed: i64) -> &'static str {
    if completed >= READY_THRESHOLD {
        "Ready for synthesis"
    } else {
        "Gathering insights"
    }
}

/// GET /api/groups/:group_id/dashboard
pub async fn get_dashboard(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Caller(user_id): Caller,
) -> ApiResult<Json<DashboardResponse>> {
    let group = groups::load_group(&state.db, group_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Group {}", group_id)))?;

    let completed =
        interviews::count_by_status(&state.db, group_id, InterviewStatus::Completed).await?;
    let your_role = members::member_role(&state.db, group_id, user_id).await?;

    Ok(Json(DashboardResponse {
        group_id,
        name: group.name,
        description: group.description,
        completed_interviews: completed,
        status: readiness_label(completed).to_string(),
        your_role,
        alignment_summary: group.alignment_summary,
        last_analyzed_at: group.last_analyzed_at,
    }))
}

/// Query parameters for history listing
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// One history entry as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub generated_at: DateTime<Utc>,
    /// None when the stored content no longer parses
    pub summary: Option<AlignmentSummary>,
    pub source_count: usize,
}

/// Requested page size, defaulting to 20; must lie in 1..=100
fn history_limit(requested: Option<i64>) -> ApiResult<i64> {
    match requested {
        None => Ok(DEFAULT_HISTORY_LIMIT),
        Some(limit) if (1..=MAX_HISTORY_LIMIT).contains(&limit) => Ok(limit),
        Some(limit) => Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}, got {}",
            MAX_HISTORY_LIMIT, limit
        ))),
    }
}

/// GET /api/groups/:group_id/summaries
pub async fn list_summaries(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
    Caller(_user_id): Caller,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    super::interviews::ensure_group_exists(&state, group_id).await?;

    let limit = history_limit(query.limit)?;
    let records = summaries::list_history(&state.db, group_id, FULL_SUMMARY_SECTION, limit).await?;

    let entries = records
        .into_iter()
        .map(|record| {
            let source_count = serde_json::from_str::<Vec<Value>>(&record.source_responses)
                .map(|sources| sources.len())
                .unwrap_or(0);
            HistoryEntry {
                id: record.id,
                user_id: record.user_id,
                generated_at: record.generated_at,
                summary: AlignmentSummary::from_json(&record.summary_content).ok(),
                source_count,
            }
        })
        .collect();

    Ok(Json(entries))
}

/// Build dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/api/groups/:group_id/dashboard", get(get_dashboard))
        .route("/api/groups/:group_id/summaries", get(list_summaries))
}
