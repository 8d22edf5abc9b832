/// Customer endpoints
///
/// # Endpoints
///
/// - `GET /customers?page&limit` - paged listing with creator/updater usernames
/// - `POST /customers` - create (phone number must be unused)
/// - `PUT /customers/:id` - overwrite every field
/// - `PUT /customers` - status transition
/// - `DELETE /customers/:id`

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::ApiJson,
    routes::params::{optional_int, path_id, required_int, IntLike, PageParams},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use callcenter_shared::{
    models::customer::{Customer, CustomerFields, CustomerRow, CustomerStatus},
    models::pagination::Page,
    services::customers,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Body of create and full update
#[derive(Debug, Default, Deserialize)]
pub struct CustomerRequest {
    pub full_name: Option<String>,
    pub year_of_birth: Option<IntLike>,
    pub phone_number: Option<String>,
    pub note: Option<String>,
    pub role_note: Option<String>,
    pub status: Option<IntLike>,
    pub team_id: Option<IntLike>,
    pub updated_by: Option<IntLike>,
}

fn parse_status(value: &IntLike) -> ApiResult<CustomerStatus> {
    value
        .as_i64()
        .and_then(|n| CustomerStatus::try_from(n).ok())
        .ok_or_else(|| ApiError::BadRequest("Invalid status value".to_string()))
}

impl CustomerRequest {
    /// Shared conversion; `updated_by` is resolved by the caller
    fn into_fields(self, updated_by: Option<i64>) -> ApiResult<CustomerFields> {
        let phone_number = self
            .phone_number
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Phone number is required".to_string()))?;

        let year_of_birth = optional_int(self.year_of_birth.as_ref(), "Invalid year_of_birth")?
            .map(i32::try_from)
            .transpose()
            .map_err(|_| ApiError::BadRequest("Invalid year_of_birth".to_string()))?;

        let team_id = optional_int(self.team_id.as_ref(), "Invalid team_id")?;

        let status = match &self.status {
            Some(value) => parse_status(value)?,
            None => CustomerStatus::New,
        };

        Ok(CustomerFields {
            full_name: self.full_name,
            year_of_birth,
            phone_number,
            note: self.note,
            role_note: self.role_note,
            status,
            team_id,
            updated_by,
        })
    }
}

/// `PUT /customers` body
#[derive(Debug, Default, Deserialize)]
pub struct StatusRequest {
    pub id: Option<IntLike>,
    pub status: Option<IntLike>,
    pub updated_by: Option<IntLike>,

    /// Whether the acting user is an administrator
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Serialize)]
pub struct CustomerResponse {
    pub message: &'static str,
    pub data: Customer,
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<Json<Page<CustomerRow>>> {
    let page = customers::list(&state.db, params.pagination()).await?;
    Ok(Json(page))
}

/// Create endpoint
///
/// ```text
/// POST /customers
/// { "phone_number": "0901234567", "full_name": "...", "team_id": 1, "updated_by": "3" }
/// ```
///
/// Responds 201. `updated_by` becomes both creator and last updater; a
/// missing `status` means new (`"0"`).
pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CustomerRequest>,
) -> ApiResult<impl IntoResponse> {
    let updated_by = optional_int(req.updated_by.as_ref(), "Invalid updated_by")?;
    let fields = req.into_fields(updated_by)?;

    let customer = customers::create(&state.db, fields).await?;

    Ok((
        StatusCode::CREATED,
        Json(CustomerResponse {
            message: "Customer created successfully",
            data: customer,
        }),
    ))
}

/// Full update endpoint
///
/// Every field is overwritten. The status must be a valid value but is not
/// checked against the transition rules.
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CustomerRequest>,
) -> ApiResult<Json<CustomerResponse>> {
    let id = path_id(&id, "customer")?;
    let updated_by = required_int(
        req.updated_by.as_ref(),
        "Updated by is required",
        "Invalid updated_by",
    )?;
    if req.status.is_none() {
        return Err(ApiError::BadRequest("Status is required".to_string()));
    }
    let fields = req.into_fields(Some(updated_by))?;

    let customer = customers::update(&state.db, id, fields).await?;

    Ok(Json(CustomerResponse {
        message: "Customer updated successfully",
        data: customer,
    }))
}

/// Status transition endpoint
///
/// ```text
/// PUT /customers
/// { "id": 42, "status": "2", "updated_by": 7, "is_admin": false }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing or non-numeric field, or an illegal transition
///   (including a numeric status outside `0..=2`)
/// - `404 Not Found`: no such customer
/// - `409 Conflict`: the status changed underneath the request
pub async fn update_status(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<StatusRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    const MISSING: &str = "Missing required fields";

    let id = required_int(req.id.as_ref(), MISSING, "Invalid customer ID")?;
    let status = required_int(req.status.as_ref(), MISSING, "Invalid updated_by or status value")?;
    let updated_by =
        required_int(req.updated_by.as_ref(), MISSING, "Invalid updated_by or status value")?;

    // A number outside the status set is an illegal move, not a malformed field
    let Ok(target) = CustomerStatus::try_from(status) else {
        let current = customers::current_status(&state.db, id).await?;
        return Err(ApiError::InvalidTransition(format!(
            "Invalid status transition from {} to {}",
            current, status
        )));
    };

    customers::transition_status(&state.db, id, target, updated_by, req.is_admin).await?;

    Ok(Json(json!({ "message": "Status updated successfully" })))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let id = path_id(&id, "customer")?;

    customers::delete(&state.db, id).await?;

    Ok(Json(json!({ "message": "Customer deleted successfully" })))
}
