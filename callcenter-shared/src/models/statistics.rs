/// Call statistics
///
/// Customers are counted per `(team, role_note)` pair. `caller` is the
/// customer's role note, kept under the name the dashboard reads.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CallCount {
    pub call_count: i64,
    pub caller: Option<String>,
    pub team_name: String,
}

impl CallCount {
    /// Counts customers grouped by team and role note, busiest group first
    ///
    /// `role_note = None` counts every role note.
    pub async fn by_team_and_role_note(
        pool: &PgPool,
        role_note: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CallCount>(
            r#"
            SELECT COUNT(c.id) AS call_count,
                   c.role_note AS caller,
                   t.team_name
            FROM customers c
            INNER JOIN teams t ON c.team_id = t.id
            WHERE ($1::TEXT IS NULL OR c.role_note = $1)
            GROUP BY t.id, t.team_name, c.role_note
            ORDER BY call_count DESC, t.team_name ASC
            "#,
        )
        .bind(role_note)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }
}
