/// Team administration

use sqlx::PgPool;
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use crate::models::pagination::{Page, Pagination};
use crate::models::team::{Team, TeamRow};

/// Lists teams; `None` returns every team on a single page
pub async fn list(pool: &PgPool, pagination: Option<Pagination>) -> ServiceResult<Page<TeamRow>> {
    match pagination {
        None => Ok(Page::unpaginated(Team::list_all(pool).await?)),
        Some(pagination) => {
            let rows = Team::list(pool, pagination.limit, pagination.offset()).await?;
            let total = Team::count(pool).await?;
            Ok(Page::new(rows, total, pagination))
        }
    }
}

pub async fn create(pool: &PgPool, team_name: &str) -> ServiceResult<Team> {
    if team_name.trim().is_empty() {
        return Err(ServiceError::invalid_argument("Team name is required"));
    }

    if Team::name_taken(pool, team_name, None).await? {
        return Err(ServiceError::conflict("Team name already exists"));
    }

    let team = Team::create(pool, team_name).await?;
    info!(team_id = team.id, team_name = %team.team_name, "Team created");

    Ok(team)
}

/// Renames a team; the new name may not belong to any other team
pub async fn update(
    pool: &PgPool,
    id: i64,
    team_name: &str,
    updated_by: Option<i64>,
) -> ServiceResult<Team> {
    if team_name.trim().is_empty() {
        return Err(ServiceError::invalid_argument("Team name is required"));
    }

    if Team::find_by_id(pool, id).await?.is_none() {
        return Err(ServiceError::NotFound("Team"));
    }

    if Team::name_taken(pool, team_name, Some(id)).await? {
        return Err(ServiceError::conflict("Team name already exists"));
    }

    let team = Team::update(pool, id, team_name, updated_by)
        .await?
        .ok_or(ServiceError::NotFound("Team"))?;

    info!(team_id = id, team_name = %team.team_name, ?updated_by, "Team updated");
    Ok(team)
}
