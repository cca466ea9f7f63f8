//! Interview catalog and submission endpoints

use align_common::db::{InterviewRecord, InterviewResponses, InterviewStatus};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use super::{Caller, CallerIdentity};
use crate::db::{groups, interviews, members, profiles};
use crate::interview::{Question, QUESTIONS};
use crate::{ApiError, ApiResult, AppState};

/// GET /api/questions
pub async fn list_questions() -> Json<&'static [Question]> {
    Json(&QUESTIONS[..])
}

/// POST /api/groups/:group_id/interviews
///
/// Stores a completed interview for the caller and joins them to the group.
/// Profile details from the auth headers refresh the caller's profile first.
pub async fn submit_interview(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    caller: CallerIdentity,
    Json(responses): Json<InterviewResponses>,
) -> ApiResult<(StatusCode, Json<InterviewRecord>)> {
    ensure_group_exists(&state, group_id).await?;
    let user_id = caller.id;

    if let Some(profile) = caller.profile() {
        profiles::upsert_profile(&state.db, &profile).await?;
    }

    let record = InterviewRecord {
        id: Uuid::new_v4(),
        user_id,
        group_id,
        responses,
        status: InterviewStatus::Completed,
        completed_at: Utc::now(),
    };

    members::ensure_member(&state.db, group_id, user_id).await?;
    interviews::insert_interview(&state.db, &record).await?;

    info!(group_id = %group_id, user_id = %user_id, interview_id = %record.id, "Interview submitted");

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/groups/:group_id/interviews
///
/// Completed (not yet synthesized) interviews, oldest first.
pub async fn list_completed_interviews(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Caller(_user_id): Caller,
) -> ApiResult<Json<Vec<InterviewRecord>>> {
    ensure_group_exists(&state, group_id).await?;
    let records = interviews::list_by_status(&state.db, group_id, InterviewStatus::Completed).await?;
    Ok(Json(records))
}

pub(crate) async fn ensure_group_exists(state: &AppState, group_id: Uuid) -> ApiResult<()> {
    match groups::load_group(&state.db, group_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::NotFound(format!("Group {}", group_id))),
    }
}

/// Build interview routes
pub fn interview_routes() -> Router<AppState> {
    Router::new()
        .route("/api/questions", get(list_questions))
        .route(
            "/api/groups/:group_id/interviews",
            get(list_completed_interviews).post(submit_interview),
        )
}
