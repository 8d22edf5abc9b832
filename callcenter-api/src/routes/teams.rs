/// Team endpoints
///
/// - `GET /teams` - every team, or one page when both `page` and `limit` are given
/// - `POST /teams` - create, name must be unused
/// - `PUT /teams/:id` - rename

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    routes::params::{optional_int, path_id, IntLike, PageParams},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use callcenter_shared::{
    models::{pagination::Page, team::TeamRow},
    services::teams,
};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub struct TeamRequest {
    pub team_name: Option<String>,
    pub updated_by: Option<IntLike>,
}

impl TeamRequest {
    fn team_name(&self) -> ApiResult<&str> {
        self.team_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Team name is required".to_string()))
    }
}

pub async fn list_teams(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<TeamRow>>> {
    let page = teams::list(&state.db, params.requested_pagination()).await?;
    Ok(Json(page))
}

pub async fn create_team(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TeamRequest>,
) -> ApiResult<impl IntoResponse> {
    let team = teams::create(&state.db, req.team_name()?).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Team created successfully",
            "data": { "team_name": team.team_name },
        })),
    ))
}

/// Rename endpoint
///
/// ```text
/// PUT /teams/3
/// { "team_name": "Night shift", "updated_by": 7 }
/// ```
///
/// ```json
/// { "message": "Team updated successfully", "data": { "id": 3, "team_name": "Night shift", "updated_by": 7 } }
/// ```
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<TeamRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = path_id(&id, "team")?;
    let team_name = req.team_name()?;
    let updated_by = optional_int(req.updated_by.as_ref(), "Invalid updated_by")?;

    let team = teams::update(&state.db, id, team_name, updated_by).await?;

    Ok(Json(json!({
        "message": "Team updated successfully",
        "data": {
            "id": team.id,
            "team_name": team.team_name,
            "updated_by": team.updated_by,
        },
    })))
}
