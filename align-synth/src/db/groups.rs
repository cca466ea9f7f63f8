//! Group database operations
//!
//! A group row carries a denormalized copy of its latest alignment summary.

use align_common::db::Group;
use align_common::{AlignmentSummary, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::error;
use uuid::Uuid;

use super::{parse_db_timestamp, to_db_timestamp};

/// Create a group with no cached summary
pub async fn create_group(
    pool: &SqlitePool,
    id: Uuid,
    name: &str,
    description: Option<&str>,
) -> Result<()> {
    sqlx::query("INSERT INTO groups (id, name, description) VALUES (?, ?, ?)")
        .bind(id.to_string())
        .bind(name)
        .bind(description)
        .execute(pool)
        .await?;

    Ok(())
}

/// Load a group by id
///
/// An unreadable cached summary is logged and reported as absent.
pub async fn load_group(pool: &SqlitePool, id: Uuid) -> Result<Option<Group>> {
    let row = sqlx::query(
        "SELECT name, description, alignment_summary, last_analyzed_at FROM groups WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let summary: Option<String> = row.get("alignment_summary");
    let alignment_summary = match summary.as_deref().map(AlignmentSummary::from_json) {
        Some(Ok(summary)) => Some(summary),
        Some(Err(e)) => {
            error!(group_id = %id, "Error parsing cached alignment summary: {}", e);
            None
        }
        None => None,
    };

    let last_analyzed_at: Option<String> = row.get("last_analyzed_at");
    let last_analyzed_at = last_analyzed_at
        .as_deref()
        .map(|v| parse_db_timestamp("last_analyzed_at", v))
        .transpose()?;

    Ok(Some(Group {
        id,
        name: row.get("name"),
        description: row.get("description"),
        alignment_summary,
        last_analyzed_at,
    }))
}

/// Overwrite the cached summary and analysis timestamp
///
/// Returns the number of rows updated (0 when the group does not exist).
pub async fn update_cached_summary(
    pool: &SqlitePool,
    id: Uuid,
    summary: &AlignmentSummary,
    analyzed_at: DateTime<Utc>,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE groups SET alignment_summary = ?, last_analyzed_at = ? WHERE id = ?",
    )
    .bind(summary.to_json()?)
    .bind(to_db_timestamp(analyzed_at))
    .bind(id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use align_common::db::init_memory_database;

    fn summary(tag: &str) -> AlignmentSummary {
        AlignmentSummary {
            purpose: format!("{tag} purpose"),
            sponsorship: "s".into(),
            resources: "r".into(),
            leadership: "l".into(),
            deliverables: "d".into(),
            plan: "p".into(),
            change: "c".into(),
            investment: "i".into(),
            benefits: "b".into(),
            overall_alignment: "o".into(),
        }
    }

    #[tokio::test]
    async fn test_new_group_has_no_cache() {
        let pool = init_memory_database().await.unwrap();
        let id = Uuid::new_v4();
        create_group(&pool, id, "Garden", Some("Community garden")).await.unwrap();

        let group = load_group(&pool, id).await.unwrap().unwrap();
        assert_eq!(group.name, "Garden");
        assert_eq!(group.description.as_deref(), Some("Community garden"));
        assert!(group.alignment_summary.is_none());
        assert!(group.last_analyzed_at.is_none());
    }

    #[tokio::test]
    async fn test_unreadable_cache_loads_as_absent() {
        let pool = init_memory_database().await.unwrap();
        let id = Uuid::new_v4();
        create_group(&pool, id, "Garden", None).await.unwrap();
        let analyzed_at = Utc::now();
        update_cached_summary(&pool, id, &summary("first"), analyzed_at).await.unwrap();

        sqlx::query("UPDATE groups SET alignment_summary = ? WHERE id = ?")
            .bind(r#"{"purpose":"old shape"}"#)
            .bind(id.to_string())
            .execute(&pool)
            .await
            .unwrap();

        let group = load_group(&pool, id).await.unwrap().unwrap();
        assert_eq!(group.name, "Garden");
        assert!(group.alignment_summary.is_none());
        assert_eq!(
            group.last_analyzed_at.map(to_db_timestamp),
            Some(to_db_timestamp(analyzed_at))
        );
    }

    #[tokio::test]
    async fn test_cache_update_is_last_writer_wins() {
        let pool = init_memory_database().await.unwrap();
        let id = Uuid::new_v4();
        create_group(&pool, id, "Garden", None).await.unwrap();

        let first_at = Utc::now();
        update_cached_summary(&pool, id, &summary("first"), first_at).await.unwrap();
        let second_at = first_at + chrono::Duration::seconds(5);
        let updated = update_cached_summary(&pool, id, &summary("second"), second_at)
            .await
            .unwrap();

        assert_eq!(updated, 1);
        let group = load_group(&pool, id).await.unwrap().unwrap();
        assert_eq!(group.alignment_summary, Some(summary("second")));
        assert_eq!(
            group.last_analyzed_at.map(to_db_timestamp),
            Some(to_db_timestamp(second_at))
        );
    }

    #[tokio::test]
    async fn test_update_unknown_group_touches_nothing() {
        let pool = init_memory_database().await.unwrap();
        let updated = update_cached_summary(&pool, Uuid::new_v4(), &summary("x"), Utc::now())
            .await
            .unwrap();
        assert_eq!(updated, 0);
    }
}
