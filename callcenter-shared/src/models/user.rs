/// Staff account model and database operations
///
/// Users are the people operating the call center: administrators, team
/// leads and operators. Accounts are created by an administrator, never
/// deleted, and carry an `is_first_login` flag that forces a password change.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     username VARCHAR(255) NOT NULL UNIQUE,
///     password VARCHAR(255) NOT NULL,          -- bcrypt hash
///     name VARCHAR(255) NOT NULL,
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     is_team_lead BOOLEAN NOT NULL DEFAULT FALSE,
///     is_first_login BOOLEAN NOT NULL DEFAULT TRUE,
///     status VARCHAR(16) NOT NULL DEFAULT '1',
///     team_id BIGINT REFERENCES teams(id),
///     created_by BIGINT REFERENCES users(id),
///     updated_by BIGINT REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// Staff account row
///
/// Not `Serialize`: the password hash must never leave the server. Use
/// [`crate::auth::jwt::SessionUser`] or [`EmployeeRow`] for output.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,

    /// Unique, matched case-sensitively on login
    pub username: String,

    /// bcrypt hash
    pub password: String,

    /// Display name
    pub name: String,

    pub is_admin: bool,
    pub is_team_lead: bool,

    /// Set on creation and on admin reset, cleared by a password update
    pub is_first_login: bool,

    pub status: String,
    pub team_id: Option<i64>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role requested when an employee is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmployeeRole {
    Admin,
    TeamLead,
    Operator,
}

impl EmployeeRole {
    /// `"0"` is admin, `"1"` team lead, anything else a plain operator
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some("0") => EmployeeRole::Admin,
            Some("1") => EmployeeRole::TeamLead,
            _ => EmployeeRole::Operator,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, EmployeeRole::Admin)
    }

    pub fn is_team_lead(&self) -> bool {
        matches!(self, EmployeeRole::TeamLead)
    }
}

/// Input for creating a new staff account
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub name: String,

    /// bcrypt hash, NOT the plaintext password
    pub password_hash: String,

    pub role: EmployeeRole,
    pub status: String,
    pub team_id: i64,
}

/// Employee listing row with audit references resolved to usernames
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EmployeeRow {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub is_admin: bool,
    pub is_team_lead: bool,
    pub is_first_login: bool,
    pub status: String,
    pub team_id: Option<i64>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_by_username: Option<String>,
    pub updated_by_username: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Inserts a new account with `is_first_login = true`
    ///
    /// # Errors
    ///
    /// Fails with a unique violation on `users_username_key` if the username
    /// is taken, or a foreign-key violation if `team_id` does not exist.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, name, password, is_admin, is_team_lead,
                               is_first_login, status, team_id, updated_at)
            VALUES ($1, $2, $3, $4, $5, TRUE, $6, $7, NOW())
            RETURNING id, username, password, name, is_admin, is_team_lead, is_first_login,
                      status, team_id, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.name)
        .bind(data.password_hash)
        .bind(data.role.is_admin())
        .bind(data.role.is_team_lead())
        .bind(data.status)
        .bind(data.team_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by exact (case-sensitive) username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, name, is_admin, is_team_lead, is_first_login,
                   status, team_id, created_by, updated_by, created_at, updated_at
            FROM users
            WHERE username = $1
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, name, is_admin, is_team_lead, is_first_login,
                   status, team_id, created_by, updated_by, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Overwrites the password hash and clears `is_first_login`
    ///
    /// Returns the number of rows updated.
    pub async fn set_password(
        pool: &PgPool,
        username: &str,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password = $2, is_first_login = FALSE, updated_at = NOW()
            WHERE username = $1
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Overwrites the password only if the stored hash equals `expected_hash`
    ///
    /// bcrypt hashes are salted, so this compares hash strings, not passwords.
    /// Returns the number of rows updated.
    pub async fn set_password_if_hash_matches(
        pool: &PgPool,
        username: &str,
        new_hash: &str,
        expected_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password = $2, is_first_login = FALSE, updated_at = NOW()
            WHERE username = $1 AND password = $3
            "#,
        )
        .bind(username)
        .bind(new_hash)
        .bind(expected_hash)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Flags the account for a mandatory password change
    ///
    /// Returns true if the user was found.
    pub async fn require_password_change(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET is_first_login = TRUE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists non-admin accounts ordered by id
    pub async fn list_employees(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<EmployeeRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EmployeeRow>(
            r#"
            SELECT u.id, u.username, u.name, u.is_admin, u.is_team_lead, u.is_first_login,
                   u.status, u.team_id, u.created_by, u.updated_by,
                   c.username AS created_by_username,
                   m.username AS updated_by_username,
                   u.created_at, u.updated_at
            FROM users u
            LEFT JOIN users c ON u.created_by = c.id
            LEFT JOIN users m ON u.updated_by = m.id
            WHERE u.is_admin = FALSE
            ORDER BY u.id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Counts non-admin accounts
    pub async fn count_employees(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE is_admin = FALSE")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_role_codes() {
        assert_eq!(EmployeeRole::from_code(Some("0")), EmployeeRole::Admin);
        assert_eq!(EmployeeRole::from_code(Some("1")), EmployeeRole::TeamLead);
        assert_eq!(EmployeeRole::from_code(Some("2")), EmployeeRole::Operator);
        assert_eq!(EmployeeRole::from_code(None), EmployeeRole::Operator);
    }

    #[test]
    fn test_employee_role_flags() {
        assert!(EmployeeRole::Admin.is_admin());
        assert!(!EmployeeRole::Admin.is_team_lead());
        assert!(EmployeeRole::TeamLead.is_team_lead());
        assert!(!EmployeeRole::Operator.is_admin());
        assert!(!EmployeeRole::Operator.is_team_lead());
    }
}
