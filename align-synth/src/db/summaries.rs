//! Summary history (`dashboard_summaries`)
//!
//! Append-only. The newest row by `generated_at` for a group and section is the
//! active summary.

use align_common::db::DashboardSummaryRecord;
use align_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::{parse_db_timestamp, parse_db_uuid, to_db_timestamp};

/// Append a history record
pub async fn insert_summary(pool: &SqlitePool, record: &DashboardSummaryRecord) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO dashboard_summaries (
            id, group_id, user_id, section, summary_content, source_responses, generated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.id.to_string())
    .bind(record.group_id.to_string())
    .bind(record.user_id.map(|id| id.to_string()))
    .bind(&record.section)
    .bind(&record.summary_content)
    .bind(&record.source_responses)
    .bind(to_db_timestamp(record.generated_at))
    .execute(pool)
    .await?;

    Ok(())
}

/// Most recent record for a group and section
pub async fn latest_summary(
    pool: &SqlitePool,
    group_id: Uuid,
    section: &str,
) -> Result<Option<DashboardSummaryRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, group_id, user_id, section, summary_content, source_responses, generated_at
        FROM dashboard_summaries
        WHERE group_id = ? AND section = ?
        ORDER BY generated_at DESC
        LIMIT 1
        "#,
    )
    .bind(group_id.to_string())
    .bind(section)
    .fetch_optional(pool)
    .await?;

    row.as_ref().map(record_from_row).transpose()
}

/// History for a group and section, newest first
pub async fn list_history(
    pool: &SqlitePool,
    group_id: Uuid,
    section: &str,
    limit: i64,
) -> Result<Vec<DashboardSummaryRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, group_id, user_id, section, summary_content, source_responses, generated_at
        FROM dashboard_summaries
        WHERE group_id = ? AND section = ?
        ORDER BY generated_at DESC
        LIMIT ?
        "#,
    )
    .bind(group_id.to_string())
    .bind(section)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter().map(record_from_row).collect()
}

fn record_from_row(row: &SqliteRow) -> Result<DashboardSummaryRecord> {
    let id: String = row.get("id");
    let group_id: String = row.get("group_id");
    let user_id: Option<String> = row.get("user_id");
    let generated_at: String = row.get("generated_at");

    Ok(DashboardSummaryRecord {
        id: parse_db_uuid("id", &id)?,
        group_id: parse_db_uuid("group_id", &group_id)?,
        user_id: user_id.as_deref().map(|v| parse_db_uuid("user_id", v)).transpose()?,
        section: row.get("section"),
        summary_content: row.get("summary_content"),
        source_responses: row.get("source_responses"),
        generated_at: parse_db_timestamp("generated_at", &generated_at)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::groups::create_group;
    use align_common::db::{init_memory_database, FULL_SUMMARY_SECTION};
    use chrono::{Duration, Utc};

    fn record(group_id: Uuid, content: &str, minutes_ago: i64) -> DashboardSummaryRecord {
        DashboardSummaryRecord {
            id: Uuid::new_v4(),
            group_id,
            user_id: None,
            section: FULL_SUMMARY_SECTION.to_string(),
            summary_content: content.to_string(),
            source_responses: "[]".to_string(),
            generated_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_latest_is_by_generated_at_not_insert_order() {
        let pool = init_memory_database().await.unwrap();
        let group = Uuid::new_v4();
        create_group(&pool, group, "Garden", None).await.unwrap();

        insert_summary(&pool, &record(group, "newest", 1)).await.unwrap();
        insert_summary(&pool, &record(group, "oldest", 60)).await.unwrap();

        let latest = latest_summary(&pool, group, FULL_SUMMARY_SECTION).await.unwrap().unwrap();
        assert_eq!(latest.summary_content, "newest");

        let history = list_history(&pool, group, FULL_SUMMARY_SECTION, 10).await.unwrap();
        let contents: Vec<&str> = history.iter().map(|r| r.summary_content.as_str()).collect();
        assert_eq!(contents, vec!["newest", "oldest"]);
    }

    #[tokio::test]
    async fn test_other_sections_are_ignored() {
        let pool = init_memory_database().await.unwrap();
        let group = Uuid::new_v4();
        create_group(&pool, group, "Garden", None).await.unwrap();

        let mut draft = record(group, "draft", 0);
        draft.section = "purpose".to_string();
        insert_summary(&pool, &draft).await.unwrap();

        assert!(latest_summary(&pool, group, FULL_SUMMARY_SECTION).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_id_round_trips() {
        let pool = init_memory_database().await.unwrap();
        let group = Uuid::new_v4();
        create_group(&pool, group, "Garden", None).await.unwrap();

        let mut with_user = record(group, "x", 0);
        with_user.user_id = Some(Uuid::new_v4());
        insert_summary(&pool, &with_user).await.unwrap();

        let latest = latest_summary(&pool, group, FULL_SUMMARY_SECTION).await.unwrap().unwrap();
        assert_eq!(latest.user_id, with_user.user_id);
    }
}
