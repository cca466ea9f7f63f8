//! Integration tests for the synthesis orchestrator
//!
//! In-memory database plus a scripted model that records every request.

use align_common::db::{
    init_memory_database, InterviewRecord, InterviewResponses, InterviewStatus, MemberRole,
    Profile, FULL_SUMMARY_SECTION,
};
use align_common::AlignmentSummary;
use align_synth::db::{groups, interviews, members, profiles, summaries};
use align_synth::llm::{ChatModel, ChatRequest, LlmError};
use align_synth::synthesis::{SummaryGenerator, SynthesisError, SynthesisOrchestrator};
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Model that answers every request with the next scripted summary
struct ScriptedModel {
    answers: Mutex<Vec<AlignmentSummary>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedModel {
    fn new(answers: Vec<AlignmentSummary>) -> Arc<Self> {
        Arc::new(Self { answers: Mutex::new(answers), requests: Mutex::new(Vec::new()) })
    }

    fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut answers = self.answers.lock().unwrap();
        if answers.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        let answer = answers.remove(0);
        Ok(serde_json::to_string(&answer).unwrap())
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn summary(tag: &str) -> AlignmentSummary {
    AlignmentSummary {
        purpose: format!("{tag} purpose"),
        sponsorship: format!("{tag} sponsorship"),
        resources: format!("{tag} resources"),
        leadership: format!("{tag} leadership"),
        deliverables: format!("{tag} deliverables"),
        plan: format!("{tag} plan"),
        change: format!("{tag} change"),
        investment: format!("{tag} investment"),
        benefits: format!("{tag} benefits"),
        overall_alignment: format!("{tag} overall"),
    }
}

struct Fixture {
    pool: SqlitePool,
    group_id: Uuid,
    admin: Uuid,
    member: Uuid,
}

/// Group with one admin and one ordinary member
async fn fixture() -> Fixture {
    let pool = init_memory_database().await.expect("Failed to create database");
    let group_id = Uuid::new_v4();
    let admin = Uuid::new_v4();
    let member = Uuid::new_v4();

    groups::create_group(&pool, group_id, "Riverside Co-op", Some("Community garden"))
        .await
        .unwrap();
    members::set_member_role(&pool, group_id, admin, MemberRole::Admin).await.unwrap();
    members::set_member_role(&pool, group_id, member, MemberRole::Member).await.unwrap();

    Fixture { pool, group_id, admin, member }
}

async fn submit(pool: &SqlitePool, group_id: Uuid, purpose: &str, minutes: i64) -> InterviewRecord {
    let user_id = Uuid::new_v4();
    let base = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
    let record = InterviewRecord {
        id: Uuid::new_v4(),
        user_id,
        group_id,
        responses: InterviewResponses { purpose: purpose.to_string(), ..Default::default() },
        status: InterviewStatus::Completed,
        completed_at: base + Duration::minutes(minutes),
    };
    interviews::insert_interview(pool, &record).await.unwrap();
    record
}

async fn pending(pool: &SqlitePool, group_id: Uuid) -> Vec<InterviewRecord> {
    interviews::list_by_status(pool, group_id, InterviewStatus::Completed).await.unwrap()
}

fn make_orchestrator(pool: &SqlitePool, model: Arc<ScriptedModel>) -> SynthesisOrchestrator {
    SynthesisOrchestrator::new(pool.clone(), SummaryGenerator::new(model))
}

#[tokio::test]
async fn test_non_admin_is_refused_without_writes() {
    let f = fixture().await;
    submit(&f.pool, f.group_id, "Grow food", 0).await;
    let model = ScriptedModel::new(vec![summary("first")]);
    let orchestrator = make_orchestrator(&f.pool, model.clone());

    let records = pending(&f.pool, f.group_id).await;
    let result = orchestrator.synthesize(f.member, f.group_id, &records).await;
    assert!(matches!(result, Err(SynthesisError::Unauthorized)));

    // Outsider with no membership row at all
    let outsider = Uuid::new_v4();
    let result = orchestrator.synthesize(outsider, f.group_id, &records).await;
    assert!(matches!(result, Err(SynthesisError::Unauthorized)));

    assert!(model.requests().is_empty());
    assert_eq!(
        interviews::count_by_status(&f.pool, f.group_id, InterviewStatus::Completed).await.unwrap(),
        1
    );
    assert!(summaries::list_history(&f.pool, f.group_id, FULL_SUMMARY_SECTION, 10)
        .await
        .unwrap()
        .is_empty());
    let group = groups::load_group(&f.pool, f.group_id).await.unwrap().unwrap();
    assert!(group.alignment_summary.is_none());
    assert!(group.last_analyzed_at.is_none());
}

#[tokio::test]
async fn test_empty_input_is_rejected_before_model_call() {
    let f = fixture().await;
    let model = ScriptedModel::new(vec![summary("unused")]);
    let orchestrator = make_orchestrator(&f.pool, model.clone());

    let result = orchestrator.synthesize(f.admin, f.group_id, &[]).await;
    assert!(matches!(result, Err(SynthesisError::EmptyInput)));
    assert!(model.requests().is_empty());
}

#[tokio::test]
async fn test_unauthorized_wins_over_empty_input() {
    let f = fixture().await;
    let model = ScriptedModel::new(vec![]);
    let orchestrator = make_orchestrator(&f.pool, model);

    let result = orchestrator.synthesize(f.member, f.group_id, &[]).await;
    assert!(matches!(result, Err(SynthesisError::Unauthorized)));
}

#[tokio::test]
async fn test_successful_run_records_history_reconciles_and_caches() {
    let f = fixture().await;
    let first = submit(&f.pool, f.group_id, "Grow food", 0).await;
    submit(&f.pool, f.group_id, "Teach kids", 5).await;
    submit(&f.pool, f.group_id, "Share tools", 10).await;
    profiles::upsert_profile(
        &f.pool,
        &Profile { id: first.user_id, email: None, full_name: Some("Ada Okafor".into()) },
    )
    .await
    .unwrap();

    let model = ScriptedModel::new(vec![summary("first")]);
    let orchestrator = make_orchestrator(&f.pool, model.clone());
    let records = pending(&f.pool, f.group_id).await;
    assert_eq!(records.len(), 3);

    let result = orchestrator.synthesize(f.admin, f.group_id, &records).await.unwrap();
    assert_eq!(result, summary("first"));

    // Prompt carries every contributor, by name where a profile exists
    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].user;
    assert!(prompt.contains("Contributor Ada Okafor (Completed: 3/5/2024):"));
    assert!(prompt.contains("Teach kids"));
    assert!(prompt.contains("Share tools"));
    assert!(!prompt.contains("Previous Analysis"));
    assert!(requests[0].response_format.as_ref().unwrap().strict);

    // Reconciled
    assert_eq!(
        interviews::count_by_status(&f.pool, f.group_id, InterviewStatus::Completed).await.unwrap(),
        0
    );
    assert_eq!(
        interviews::count_by_status(&f.pool, f.group_id, InterviewStatus::Reconciled).await.unwrap(),
        3
    );

    // History
    let history = summaries::list_history(&f.pool, f.group_id, FULL_SUMMARY_SECTION, 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_id, Some(f.admin));
    assert_eq!(AlignmentSummary::from_json(&history[0].summary_content).unwrap(), summary("first"));
    let sources: Vec<serde_json::Value> = serde_json::from_str(&history[0].source_responses).unwrap();
    assert_eq!(sources.len(), 3);

    // Group cache
    let group = groups::load_group(&f.pool, f.group_id).await.unwrap().unwrap();
    assert_eq!(group.alignment_summary, Some(summary("first")));
    assert_eq!(group.last_analyzed_at, Some(history[0].generated_at));
}

#[tokio::test]
async fn test_second_run_without_new_interviews_is_empty() {
    let f = fixture().await;
    submit(&f.pool, f.group_id, "Grow food", 0).await;
    let model = ScriptedModel::new(vec![summary("first"), summary("second")]);
    let orchestrator = make_orchestrator(&f.pool, model.clone());

    let records = pending(&f.pool, f.group_id).await;
    orchestrator.synthesize(f.admin, f.group_id, &records).await.unwrap();

    let records = pending(&f.pool, f.group_id).await;
    let result = orchestrator.synthesize(f.admin, f.group_id, &records).await;
    assert!(matches!(result, Err(SynthesisError::EmptyInput)));
    assert_eq!(model.requests().len(), 1);
}

#[tokio::test]
async fn test_previous_summary_feeds_next_prompt() {
    let f = fixture().await;
    submit(&f.pool, f.group_id, "Grow food", 0).await;
    let model = ScriptedModel::new(vec![summary("first"), summary("second")]);
    let orchestrator = make_orchestrator(&f.pool, model.clone());

    let records = pending(&f.pool, f.group_id).await;
    orchestrator.synthesize(f.admin, f.group_id, &records).await.unwrap();

    submit(&f.pool, f.group_id, "Build a greenhouse", 60).await;
    let records = pending(&f.pool, f.group_id).await;
    assert_eq!(records.len(), 1);
    let result = orchestrator.synthesize(f.admin, f.group_id, &records).await.unwrap();
    assert_eq!(result, summary("second"));

    let requests = model.requests();
    let prompt = &requests[1].user;
    assert!(prompt.contains("Previous Analysis (for context and continuity):"));
    assert!(prompt.contains("- Purpose: first purpose"));
    assert!(prompt.contains("Build a greenhouse"));
    assert!(!prompt.contains("Grow food"));

    let history = summaries::list_history(&f.pool, f.group_id, FULL_SUMMARY_SECTION, 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(AlignmentSummary::from_json(&history[0].summary_content).unwrap(), summary("second"));

    let group = groups::load_group(&f.pool, f.group_id).await.unwrap().unwrap();
    assert_eq!(group.alignment_summary, Some(summary("second")));
}

#[tokio::test]
async fn test_unreadable_previous_summary_is_ignored() {
    let f = fixture().await;
    summaries::insert_summary(
        &f.pool,
        &align_common::db::DashboardSummaryRecord {
            id: Uuid::new_v4(),
            group_id: f.group_id,
            user_id: None,
            section: FULL_SUMMARY_SECTION.to_string(),
            summary_content: "{\"purpose\": \"half a summary\"}".to_string(),
            source_responses: "[]".to_string(),
            generated_at: Utc::now(),
        },
    )
    .await
    .unwrap();
    submit(&f.pool, f.group_id, "Grow food", 0).await;

    let model = ScriptedModel::new(vec![summary("fresh")]);
    let orchestrator = make_orchestrator(&f.pool, model.clone());
    let records = pending(&f.pool, f.group_id).await;
    orchestrator.synthesize(f.admin, f.group_id, &records).await.unwrap();

    assert!(!model.requests()[0].user.contains("Previous Analysis"));
}

#[tokio::test]
async fn test_history_write_failure_does_not_block_other_writes() {
    let f = fixture().await;
    submit(&f.pool, f.group_id, "Grow food", 0).await;
    submit(&f.pool, f.group_id, "Teach kids", 1).await;

    sqlx::query("DROP TABLE dashboard_summaries").execute(&f.pool).await.unwrap();

    let model = ScriptedModel::new(vec![summary("first")]);
    let orchestrator = make_orchestrator(&f.pool, model);
    let records = pending(&f.pool, f.group_id).await;

    let result = orchestrator.synthesize(f.admin, f.group_id, &records).await.unwrap();
    assert_eq!(result, summary("first"));

    assert_eq!(
        interviews::count_by_status(&f.pool, f.group_id, InterviewStatus::Reconciled).await.unwrap(),
        2
    );
    let group = groups::load_group(&f.pool, f.group_id).await.unwrap().unwrap();
    assert_eq!(group.alignment_summary, Some(summary("first")));
    assert!(group.last_analyzed_at.is_some());
}

#[tokio::test]
async fn test_model_failure_leaves_state_untouched() {
    let f = fixture().await;
    submit(&f.pool, f.group_id, "Grow food", 0).await;

    let model = ScriptedModel::new(vec![]);
    let orchestrator = make_orchestrator(&f.pool, model);
    let records = pending(&f.pool, f.group_id).await;

    let result = orchestrator.synthesize(f.admin, f.group_id, &records).await;
    assert!(matches!(result, Err(SynthesisError::Upstream(_))));

    assert_eq!(
        interviews::count_by_status(&f.pool, f.group_id, InterviewStatus::Completed).await.unwrap(),
        1
    );
    assert!(summaries::list_history(&f.pool, f.group_id, FULL_SUMMARY_SECTION, 10)
        .await
        .unwrap()
        .is_empty());
}
