//! Summary synthesis endpoint
//!
//! One synthesis at a time per group: a second request for a group whose
//! synthesis is still running gets 409.

use align_common::db::InterviewStatus;
use align_common::AlignmentSummary;
use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use super::Caller;
use crate::db::interviews;
use crate::{ApiError, ApiResult, AppState};

/// Marks a group as synthesizing until dropped
pub struct SynthesisGuard {
    in_flight: Arc<Mutex<HashSet<Uuid>>>,
    group_id: Uuid,
}

impl SynthesisGuard {
    /// Claim the group, or None if a synthesis is already running for it
    pub fn acquire(in_flight: &Arc<Mutex<HashSet<Uuid>>>, group_id: Uuid) -> Option<Self> {
        let mut groups = in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if !groups.insert(group_id) {
            return None;
        }
        Some(Self { in_flight: Arc::clone(in_flight), group_id })
    }
}

impl Drop for SynthesisGuard {
    fn drop(&mut self) {
        let mut groups = self.in_flight.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        groups.remove(&self.group_id);
    }
}

/// POST /api/groups/:group_id/summary
///
/// Synthesizes every `completed` interview of the group. Admin only.
pub async fn generate_summary(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Caller(caller): Caller,
) -> ApiResult<Json<AlignmentSummary>> {
    super::interviews::ensure_group_exists(&state, group_id).await?;

    let _guard = SynthesisGuard::acquire(&state.in_flight, group_id).ok_or_else(|| {
        ApiError::Conflict(format!("Synthesis already running for group {}", group_id))
    })?;

    let pending = interviews::list_by_status(&state.db, group_id, InterviewStatus::Completed).await?;
    let summary = state.orchestrator.synthesize(caller, group_id, &pending).await?;

    Ok(Json(summary))
}

/// Build summary routes
pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/api/groups/:group_id/summary", post(generate_summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_is_exclusive_per_group_and_released_on_drop() {
        let in_flight = Arc::new(Mutex::new(HashSet::new()));
        let group = Uuid::new_v4();
        let other = Uuid::new_v4();

        let first = SynthesisGuard::acquire(&in_flight, group).unwrap();
        assert!(SynthesisGuard::acquire(&in_flight, group).is_none());
        assert!(SynthesisGuard::acquire(&in_flight, other).is_some());

        drop(first);
        assert!(SynthesisGuard::acquire(&in_flight, group).is_some());
    }
}
