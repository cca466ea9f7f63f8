//! Interview store
//!
//! Interviews are written once on submission. The only later change is the
//! `completed` → `reconciled` status flip after a successful synthesis.

use align_common::db::{InterviewRecord, InterviewResponses, InterviewStatus};
use align_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use uuid::Uuid;

use super::{parse_db_timestamp, parse_db_uuid, to_db_timestamp};

/// Save a submitted interview
pub async fn insert_interview(pool: &SqlitePool, record: &InterviewRecord) -> Result<()> {
    let responses = serde_json::to_string(&record.responses)?;

    sqlx::query(
        r#"
        INSERT INTO interview_responses (id, user_id, group_id, responses, status, completed_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.user_id.to_string())
    .bind(record.group_id.to_string())
    .bind(responses)
    .bind(record.status.as_str())
    .bind(to_db_timestamp(record.completed_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Interviews of a group with the given status, oldest first
pub async fn list_by_status(
    pool: &SqlitePool,
    group_id: Uuid,
    status: InterviewStatus,
) -> Result<Vec<InterviewRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, group_id, responses, status, completed_at
        FROM interview_responses
        WHERE group_id = ? AND status = ?
        ORDER BY completed_at ASC, id ASC
        "#,
    )
    .bind(group_id.to_string())
    .bind(status.as_str())
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

/// Number of interviews of a group with the given status
pub async fn count_by_status(
    pool: &SqlitePool,
    group_id: Uuid,
    status: InterviewStatus,
) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM interview_responses WHERE group_id = ? AND status = ?",
    )
    .bind(group_id.to_string())
    .bind(status.as_str())
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Load one interview by id
pub async fn load_interview(pool: &SqlitePool, id: Uuid) -> Result<Option<InterviewRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, user_id, group_id, responses, status, completed_at
        FROM interview_responses
        WHERE id = ?
        "#,
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(record_from_row).transpose()
}

/// Flip interviews to `reconciled`
///
/// An empty id set issues no query. Returns the number of rows updated.
pub async fn mark_reconciled(pool: &SqlitePool, ids: &[Uuid]) -> Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE interview_responses SET status = ");
    builder.push_bind(InterviewStatus::Reconciled.as_str());
    builder.push(" WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    separated.push_unseparated(")");

    let result = builder.build().execute(pool).await?;
    Ok(result.rows_affected())
}

fn record_from_row(row: &SqliteRow) -> Result<InterviewRecord> {
    let id: String = row.get("id");
    let user_id: String = row.get("user_id");
    let group_id: String = row.get("group_id");
    let responses: String = row.get("responses");
    let status: String = row.get("status");
    let completed_at: String = row.get("completed_at");

    let responses: InterviewResponses = serde_json::from_str(&responses)
        .map_err(|e| Error::Internal(format!("Failed to deserialize responses: {}", e)))?;

    Ok(InterviewRecord {
        id: parse_db_uuid("id", &id)?,
        user_id: parse_db_uuid("user_id", &user_id)?,
        group_id: parse_db_uuid("group_id", &group_id)?,
        responses,
        status: status.parse()?,
        completed_at: parse_db_timestamp("completed_at", &completed_at)?,
    })
}
