/// Call statistics

use sqlx::PgPool;
use tracing::debug;

use crate::error::ServiceResult;
use crate::models::statistics::CallCount;

/// Absent, empty and the literal `"null"` all mean "every role note"
pub fn normalize_role_note(role_note: Option<&str>) -> Option<&str> {
    role_note.filter(|r| !r.is_empty() && *r != "null")
}

pub async fn call_counts(pool: &PgPool, role_note: Option<&str>) -> ServiceResult<Vec<CallCount>> {
    let role_note = normalize_role_note(role_note);
    let rows = CallCount::by_team_and_role_note(pool, role_note).await?;

    debug!(role_note = ?role_note, groups = rows.len(), "Call counts computed");
    Ok(rows)
}
