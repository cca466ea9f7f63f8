//! Profile lookup
//!
//! Maps user identifiers to display names and emails.

use align_common::db::Profile;
use align_common::Result;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

use super::parse_db_uuid;

/// Insert or replace a profile
pub async fn upsert_profile(pool: &SqlitePool, profile: &Profile) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (id, email, full_name) VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET email = excluded.email, full_name = excluded.full_name
        "#,
    )
    .bind(profile.id.to_string())
    .bind(&profile.email)
    .bind(&profile.full_name)
    .execute(pool)
    .await?;

    Ok(())
}

/// Load profiles for a set of user ids, keyed by id
///
/// Ids without a profile row are simply absent from the map.
pub async fn load_profiles(pool: &SqlitePool, ids: &[Uuid]) -> Result<HashMap<Uuid, Profile>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("SELECT id, email, full_name FROM profiles WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.to_string());
    }
    separated.push_unseparated(")");

    let rows = builder.build().fetch_all(pool).await?;

    let mut profiles = HashMap::with_capacity(rows.len());
    for row in rows {
        let id: String = row.get("id");
        let id = parse_db_uuid("profiles.id", &id)?;
        profiles.insert(
            id,
            Profile {
                id,
                email: row.get("email"),
                full_name: row.get("full_name"),
            },
        );
    }

    Ok(profiles)
}
