/// Team model and database operations
///
/// Teams group operators and customers. Names are unique; teams are never
/// deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Team row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    pub id: i64,
    pub team_name: String,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Team listing row; `created_by` / `updated_by` hold usernames
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamRow {
    pub id: i64,
    pub team_name: String,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub async fn create(pool: &PgPool, team_name: &str) -> Result<Self, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO teams (team_name, updated_at)
            VALUES ($1, NOW())
            RETURNING id, team_name, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(team_name)
        .fetch_one(pool)
        .await?;

        Ok(team)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT id, team_name, created_by, updated_by, created_at, updated_at
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Whether a team with this name exists, optionally ignoring one id
    pub async fn name_taken(
        pool: &PgPool,
        team_name: &str,
        except_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM teams
                WHERE team_name = $1 AND ($2::BIGINT IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(team_name)
        .bind(except_id)
        .fetch_one(pool)
        .await?;

        Ok(taken)
    }

    /// Renames a team and records who did it
    pub async fn update(
        pool: &PgPool,
        id: i64,
        team_name: &str,
        updated_by: Option<i64>,
    ) -> Result<Option<Self>, sqlx::Error> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            UPDATE teams
            SET team_name = $2, updated_by = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, team_name, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(team_name)
        .bind(updated_by)
        .fetch_optional(pool)
        .await?;

        Ok(team)
    }

    /// Lists every team ordered by id
    pub async fn list_all(pool: &PgPool) -> Result<Vec<TeamRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT t.id, t.team_name,
                   c.username AS created_by,
                   m.username AS updated_by,
                   t.created_at, t.updated_at
            FROM teams t
            LEFT JOIN users c ON t.created_by = c.id
            LEFT JOIN users m ON t.updated_by = m.id
            ORDER BY t.id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Lists one page of teams ordered by id
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<TeamRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT t.id, t.team_name,
                   c.username AS created_by,
                   m.username AS updated_by,
                   t.created_at, t.updated_at
            FROM teams t
            LEFT JOIN users c ON t.created_by = c.id
            LEFT JOIN users m ON t.updated_by = m.id
            ORDER BY t.id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM teams")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
