/// Customer model and database operations
///
/// A customer is one caller record worked by the call center. Its `status`
/// moves through a small state machine.
///
/// # State Machine
///
/// ```text
/// 0 (new) ──────────────→ 1 (in progress)
///    │                         │
///    └──────→ 2 (closed) ←─────┘
///               │
///               └──→ 1   administrators only, clears updated_by
/// ```
///
/// Any pair not drawn above (including staying in the same state) is rejected.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE customers (
///     id BIGSERIAL PRIMARY KEY,
///     full_name VARCHAR(255),
///     year_of_birth INTEGER,
///     phone_number VARCHAR(32) NOT NULL UNIQUE,
///     note TEXT,
///     role_note VARCHAR(255),
///     status VARCHAR(1) NOT NULL DEFAULT '0' CHECK (status IN ('0', '1', '2')),
///     team_id BIGINT REFERENCES teams(id),
///     created_by BIGINT REFERENCES users(id),
///     updated_by BIGINT REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef};
use sqlx::{PgPool, Postgres};

/// Customer status, stored as the text `'0'`, `'1'` or `'2'`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerStatus {
    /// `0`: not yet handled
    New,

    /// `1`: claimed by an operator
    InProgress,

    /// `2`: done
    Closed,
}

/// Who gets recorded as `updated_by` after a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribution {
    /// The acting user
    Actor,

    /// Nobody: the record is released from its previous owner
    Cleared,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid customer status: {0}")]
pub struct StatusParseError(pub String);

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 3] = [
        CustomerStatus::New,
        CustomerStatus::InProgress,
        CustomerStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::New => "0",
            CustomerStatus::InProgress => "1",
            CustomerStatus::Closed => "2",
        }
    }

    /// Checks the transition table
    pub fn can_transition_to(&self, target: CustomerStatus, actor_is_admin: bool) -> bool {
        match (self, target) {
            (CustomerStatus::New, CustomerStatus::InProgress) => true,
            (CustomerStatus::New, CustomerStatus::Closed) => true,
            (CustomerStatus::InProgress, CustomerStatus::Closed) => true,

            // Reopening a closed record
            (CustomerStatus::Closed, CustomerStatus::InProgress) => actor_is_admin,

            _ => false,
        }
    }

    /// Decides a transition: `None` when illegal, otherwise the attribution
    /// to store alongside the new status
    pub fn check_transition(
        &self,
        target: CustomerStatus,
        actor_is_admin: bool,
    ) -> Option<Attribution> {
        if !self.can_transition_to(target, actor_is_admin) {
            return None;
        }

        if *self == CustomerStatus::Closed {
            Some(Attribution::Cleared)
        } else {
            Some(Attribution::Actor)
        }
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "0" => Ok(CustomerStatus::New),
            "1" => Ok(CustomerStatus::InProgress),
            "2" => Ok(CustomerStatus::Closed),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

impl TryFrom<i64> for CustomerStatus {
    type Error = StatusParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        value.to_string().parse()
    }
}

impl Serialize for CustomerStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Accepts `"1"` as well as `1`
impl<'de> Deserialize<'de> for CustomerStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Str(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => CustomerStatus::try_from(n),
            Raw::Str(s) => s.parse(),
        }
        .map_err(serde::de::Error::custom)
    }
}

impl sqlx::Type<Postgres> for CustomerStatus {
    fn type_info() -> PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> sqlx::Decode<'r, Postgres> for CustomerStatus {
    fn decode(value: PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <&str as sqlx::Decode<Postgres>>::decode(value)?;
        Ok(raw.parse()?)
    }
}

impl<'q> sqlx::Encode<'q, Postgres> for CustomerStatus {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Customer row as stored
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Customer {
    pub id: i64,
    pub full_name: Option<String>,
    pub year_of_birth: Option<i32>,
    pub phone_number: String,
    pub note: Option<String>,
    pub role_note: Option<String>,
    pub status: CustomerStatus,
    pub team_id: Option<i64>,
    pub created_by: Option<i64>,
    pub updated_by: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Customer listing row; `created_by` / `updated_by` hold usernames
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerRow {
    pub id: i64,
    pub full_name: Option<String>,
    pub year_of_birth: Option<i32>,
    pub phone_number: String,
    pub note: Option<String>,
    pub role_note: Option<String>,
    pub status: CustomerStatus,
    pub team_id: Option<i64>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Every editable customer field
///
/// Used by both create (where `updated_by` also becomes `created_by`) and
/// full update.
#[derive(Debug, Clone)]
pub struct CustomerFields {
    pub full_name: Option<String>,
    pub year_of_birth: Option<i32>,
    pub phone_number: String,
    pub note: Option<String>,
    pub role_note: Option<String>,
    pub status: CustomerStatus,
    pub team_id: Option<i64>,
    pub updated_by: Option<i64>,
}

impl Customer {
    pub async fn create(pool: &PgPool, data: &CustomerFields) -> Result<Self, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (full_name, year_of_birth, phone_number, note, role_note,
                                   status, team_id, created_by, created_at, updated_by, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), $8, NOW())
            RETURNING id, full_name, year_of_birth, phone_number, note, role_note, status,
                      team_id, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(&data.full_name)
        .bind(data.year_of_birth)
        .bind(&data.phone_number)
        .bind(&data.note)
        .bind(&data.role_note)
        .bind(data.status)
        .bind(data.team_id)
        .bind(data.updated_by)
        .fetch_one(pool)
        .await?;

        Ok(customer)
    }

    /// Whether any customer already uses this phone number
    pub async fn phone_taken(pool: &PgPool, phone_number: &str) -> Result<bool, sqlx::Error> {
        let taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM customers WHERE phone_number = $1)")
                .bind(phone_number)
                .fetch_one(pool)
                .await?;

        Ok(taken)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, full_name, year_of_birth, phone_number, note, role_note, status,
                   team_id, created_by, updated_by, created_at, updated_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Current status, `None` if the customer doesn't exist
    pub async fn current_status(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<CustomerStatus>, sqlx::Error> {
        let status = sqlx::query_scalar::<_, CustomerStatus>(
            "SELECT status FROM customers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(status)
    }

    /// Overwrites every editable field
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: &CustomerFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET full_name = $2,
                year_of_birth = $3,
                phone_number = $4,
                note = $5,
                role_note = $6,
                status = $7,
                team_id = $8,
                updated_by = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, full_name, year_of_birth, phone_number, note, role_note, status,
                      team_id, created_by, updated_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&data.full_name)
        .bind(data.year_of_birth)
        .bind(&data.phone_number)
        .bind(&data.note)
        .bind(&data.role_note)
        .bind(data.status)
        .bind(data.team_id)
        .bind(data.updated_by)
        .fetch_optional(pool)
        .await?;

        Ok(customer)
    }

    /// Writes a status transition in one statement
    ///
    /// Only applies while the row still has status `from`, so a transition
    /// decided on a stale read never lands. Returns the number of rows updated.
    pub async fn apply_status(
        pool: &PgPool,
        id: i64,
        from: CustomerStatus,
        to: CustomerStatus,
        updated_by: Option<i64>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET status = $3, updated_by = $4, updated_at = NOW()
            WHERE id = $1 AND status = $2
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(updated_by)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deletes a customer, returning whether a row was removed
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists one page ordered by id, audit references resolved to usernames
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CustomerRow>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT c.id, c.full_name, c.year_of_birth, c.phone_number, c.note, c.role_note,
                   c.status, c.team_id,
                   u.username AS created_by,
                   m.username AS updated_by,
                   c.created_at, c.updated_at
            FROM customers c
            LEFT JOIN users u ON c.created_by = u.id
            LEFT JOIN users m ON c.updated_by = m.id
            ORDER BY c.id ASC
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
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
