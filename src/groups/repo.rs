use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Group {
    pub async fn create(
        db: &PgPool,
        name: &str,
        description: Option<&str>,
        created_by: Uuid,
    ) -> anyhow::Result<Group> {
        let mut tx = db.begin().await?;
        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        // The creator is always a member of their own group.
        sqlx::query("INSERT INTO group_members (group_id, user_id) VALUES ($1, $2)")
            .bind(group.id)
            .bind(created_by)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(group)
    }

    pub async fn list_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT g.id, g.name, g.description, g.created_by, g.created_at, g.updated_at
            FROM groups g
            JOIN group_members m ON m.group_id = g.id
            WHERE m.user_id = $1
            ORDER BY m.joined_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(groups)
    }

    pub async fn add_member(db: &PgPool, group_id: Uuid, user_id: Uuid) -> Result<(), ApiError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM groups WHERE id = $1)")
            .bind(group_id)
            .fetch_one(db)
            .await?;
        if !exists {
            return Err(ApiError::NotFound("group"));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO group_members (group_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::conflict("already a member of this group"));
        }
        Ok(())
    }
}

/// Resolve the group a request operates on. With an explicit `group_id` the
/// caller must be a member of that group; without one, their earliest joined
/// group is used. A caller in no group at all is an explicit error, never an
/// empty result.
pub async fn resolve_group(
    db: &PgPool,
    user_id: Uuid,
    group_id: Option<Uuid>,
) -> Result<Group, ApiError> {
    match group_id {
        Some(id) => sqlx::query_as::<_, Group>(
            r#"
            SELECT g.id, g.name, g.description, g.created_by, g.created_at, g.updated_at
            FROM groups g
            JOIN group_members m ON m.group_id = g.id
            WHERE g.id = $1 AND m.user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or(ApiError::NotFound("group")),
        None => sqlx::query_as::<_, Group>(
            r#"
            SELECT g.id, g.name, g.description, g.created_by, g.created_at, g.updated_at
            FROM groups g
            JOIN group_members m ON m.group_id = g.id
            WHERE m.user_id = $1
            ORDER BY m.joined_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or(ApiError::NoGroupMembership),
    }
}
