/// Statistics endpoint
///
/// ```text
/// GET /statistical?role_note=sales
/// ```
///
/// ```json
/// { "data": [ { "call_count": 12, "caller": "sales", "team_name": "Team A" } ] }
/// ```
///
/// `role_note` absent, empty or `null` counts every role note.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use callcenter_shared::{models::statistics::CallCount, services::statistics};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct StatisticsParams {
    pub role_note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub data: Vec<CallCount>,
}

pub async fn call_statistics(
    State(state): State<AppState>,
    Query(params): Query<StatisticsParams>,
) -> ApiResult<Json<StatisticsResponse>> {
    let data = statistics::call_counts(&state.db, params.role_note.as_deref()).await?;
    Ok(Json(StatisticsResponse { data }))
}
