//! Synthesis orchestrator
//!
//! Gates (authorization, non-empty input) fail the run with no writes. After
//! the model answers, three writes follow in order: history insert,
//! interview reconciliation, group cache refresh. They are independent and
//! best-effort: a failure is logged and the next write still runs. There is
//! no transaction and no rollback, so history can diverge from interview
//! status when the history insert fails.

use align_common::db::{DashboardSummaryRecord, InterviewRecord, Profile, FULL_SUMMARY_SECTION};
use align_common::AlignmentSummary;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{SummaryGenerator, SynthesisError};
use crate::db::{groups, interviews, members, profiles, summaries};

/// Coordinates one synthesis run against the database and the model
#[derive(Clone)]
pub struct SynthesisOrchestrator {
    db: SqlitePool,
    generator: SummaryGenerator,
}

impl SynthesisOrchestrator {
    pub fn new(db: SqlitePool, generator: SummaryGenerator) -> Self {
        Self { db, generator }
    }

    /// Synthesize `interviews` into a new summary for `group_id`
    ///
    /// Returns the generated summary even if some of the follow-up writes failed.
    pub async fn synthesize(
        &self,
        caller: Uuid,
        group_id: Uuid,
        interviews: &[InterviewRecord],
    ) -> Result<AlignmentSummary, SynthesisError> {
        self.authorize(caller, group_id).await?;

        if interviews.is_empty() {
            info!(group_id = %group_id, "No interviews to synthesize");
            return Err(SynthesisError::EmptyInput);
        }

        info!(
            group_id = %group_id,
            interview_count = interviews.len(),
            model = %self.generator.model_name(),
            "Starting alignment synthesis"
        );

        let profiles = self.load_profiles(interviews).await;
        let previous = self.load_previous_summary(group_id).await;

        let summary = self
            .generator
            .synthesize(interviews, &profiles, previous.as_ref())
            .await?;

        let generated_at = Utc::now();
        self.record_history(caller, group_id, interviews, &summary, generated_at).await;
        self.reconcile(group_id, interviews).await;
        self.refresh_group_cache(group_id, &summary, generated_at).await;

        info!(group_id = %group_id, "Alignment synthesis complete");
        Ok(summary)
    }

    /// Fail closed unless the caller is an admin of the group
    async fn authorize(&self, caller: Uuid, group_id: Uuid) -> Result<(), SynthesisError> {
        match members::member_role(&self.db, group_id, caller).await {
            Ok(Some(role)) if role.is_admin() => Ok(()),
            Ok(role) => {
                warn!(
                    group_id = %group_id,
                    caller = %caller,
                    role = role.map(|r| r.as_str()).unwrap_or("none"),
                    "Synthesis refused: caller is not a group admin"
                );
                Err(SynthesisError::Unauthorized)
            }
            Err(e) => {
                error!(group_id = %group_id, caller = %caller, "Role lookup failed: {}", e);
                Err(SynthesisError::Unauthorized)
            }
        }
    }

    async fn load_profiles(&self, interviews: &[InterviewRecord]) -> HashMap<Uuid, Profile> {
        let mut ids: Vec<Uuid> = interviews.iter().map(|i| i.user_id).collect();
        ids.sort();
        ids.dedup();

        match profiles::load_profiles(&self.db, &ids).await {
            Ok(profiles) => profiles,
            Err(e) => {
                warn!("Profile lookup failed, using fallback names: {}", e);
                HashMap::new()
            }
        }
    }

    /// Most recent stored summary, or None when absent or unreadable
    async fn load_previous_summary(&self, group_id: Uuid) -> Option<AlignmentSummary> {
        let record = match summaries::latest_summary(&self.db, group_id, FULL_SUMMARY_SECTION).await {
            Ok(record) => record?,
            Err(e) => {
                error!(group_id = %group_id, "Error querying previous summary: {}", e);
                return None;
            }
        };

        match AlignmentSummary::from_json(&record.summary_content) {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!(
                    group_id = %group_id,
                    record_id = %record.id,
                    "Error parsing previous summary JSON: {}", e
                );
                None
            }
        }
    }

    async fn record_history(
        &self,
        caller: Uuid,
        group_id: Uuid,
        interviews: &[InterviewRecord],
        summary: &AlignmentSummary,
        generated_at: DateTime<Utc>,
    ) {
        let encoded = summary
            .to_json()
            .and_then(|content| serde_json::to_string(interviews).map(|sources| (content, sources)));
        let (summary_content, source_responses) = match encoded {
            Ok(pair) => pair,
            Err(e) => {
                warn!(group_id = %group_id, "Error encoding summary history: {}", e);
                return;
            }
        };

        let record = DashboardSummaryRecord {
            id: Uuid::new_v4(),
            group_id,
            user_id: Some(caller),
            section: FULL_SUMMARY_SECTION.to_string(),
            summary_content,
            source_responses,
            generated_at,
        };

        if let Err(e) = summaries::insert_summary(&self.db, &record).await {
            warn!(group_id = %group_id, "Error saving to dashboard_summaries: {}", e);
        }
    }

    async fn reconcile(&self, group_id: Uuid, records: &[InterviewRecord]) {
        let ids: Vec<Uuid> = records.iter().map(|i| i.id).collect();
        if ids.is_empty() {
            return;
        }

        match interviews::mark_reconciled(&self.db, &ids).await {
            Ok(updated) => info!(group_id = %group_id, updated, "Interviews marked reconciled"),
            Err(e) => warn!(group_id = %group_id, "Error marking interviews reconciled: {}", e),
        }
    }

    async fn refresh_group_cache(
        &self,
        group_id: Uuid,
        summary: &AlignmentSummary,
        analyzed_at: DateTime<Utc>,
    ) {
        match groups::update_cached_summary(&self.db, group_id, summary, analyzed_at).await {
            Ok(0) => warn!(group_id = %group_id, "Group not found while caching summary"),
            Ok(_) => {}
            Err(e) => warn!(group_id = %group_id, "Error updating group summary cache: {}", e),
        }
    }
}
