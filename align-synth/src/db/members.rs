//! Group membership and roles

use align_common::db::MemberRole;
use align_common::Result;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Add or change a member's role
pub async fn set_member_role(
    pool: &SqlitePool,
    group_id: Uuid,
    user_id: Uuid,
    role: MemberRole,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO group_members (group_id, user_id, role) VALUES (?, ?, ?)
        ON CONFLICT(group_id, user_id) DO UPDATE SET role = excluded.role
        "#,
    )
    .bind(group_id.to_string())
    .bind(user_id.to_string())
    .bind(role.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

/// Join a group as an ordinary member, keeping any existing role
pub async fn ensure_member(pool: &SqlitePool, group_id: Uuid, user_id: Uuid) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO group_members (group_id, user_id, role) VALUES (?, ?, ?)")
        .bind(group_id.to_string())
        .bind(user_id.to_string())
        .bind(MemberRole::Member.as_str())
        .execute(pool)
        .await?;

    Ok(())
}

/// Role of a user in a group, or None when not a member
pub async fn member_role(
    pool: &SqlitePool,
    group_id: Uuid,
    user_id: Uuid,
) -> Result<Option<MemberRole>> {
    let role: Option<String> =
        sqlx::query_scalar("SELECT role FROM group_members WHERE group_id = ? AND user_id = ?")
            .bind(group_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(pool)
            .await?;

    Ok(role.as_deref().map(MemberRole::from_stored))
}
