/// Employee endpoints
///
/// - `GET /employees?page&limit` - non-admin accounts
/// - `POST /employees` - create an account; the initial password is the username
/// - `PUT /employees` - force a password change on next login

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    routes::params::{required_int, IntLike, PageParams},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use callcenter_shared::{
    models::{pagination::Page, user::EmployeeRow},
    services::employees::{self, NewEmployee},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

const REQUIRED: &str = "Username, name, and team_id are required";

#[derive(Debug, Default, Deserialize)]
pub struct CreateEmployeeRequest {
    pub username: Option<String>,
    pub name: Option<String>,

    /// `"0"` admin, `"1"` team lead, anything else operator
    pub user_role: Option<String>,

    pub status: Option<String>,
    pub team_id: Option<IntLike>,
}

#[derive(Debug, Serialize)]
pub struct CreatedEmployee {
    pub username: String,
    pub name: String,
    pub team_id: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetEmployeeRequest {
    pub id: Option<IntLike>,
}

pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<EmployeeRow>>> {
    let page = employees::list(&state.db, params.pagination()).await?;
    Ok(Json(page))
}

/// Create endpoint
///
/// ```text
/// POST /employees
/// { "username": "op7", "name": "Operator Seven", "user_role": "2", "team_id": "1" }
/// ```
///
/// Responds 201 with `{ message, data: { username, name, team_id } }`.
pub async fn create_employee(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateEmployeeRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = req
        .username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(REQUIRED.to_string()))?;
    let name = req
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(REQUIRED.to_string()))?;
    let team_id = required_int(
        req.team_id.as_ref(),
        REQUIRED,
        "Invalid team_id, it must be an integer",
    )?;

    let user = employees::create(
        &state.db,
        NewEmployee {
            username,
            name,
            user_role: req.user_role,
            status: req.status,
            team_id,
        },
    )
    .await?;

    let data = CreatedEmployee {
        username: user.username,
        name: user.name,
        team_id,
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User created successfully", "data": data })),
    ))
}

pub async fn reset_employee_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResetEmployeeRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = required_int(req.id.as_ref(), "User ID is required", "Invalid user ID")?;

    employees::require_password_reset(&state.db, id).await?;

    Ok(Json(json!({ "message": "Reset password successfully" })))
}
