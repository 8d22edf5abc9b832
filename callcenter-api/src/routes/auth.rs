/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /auth/login` - check credentials, set the session cookie
/// - `POST /auth/logout` - clear the session cookie
/// - `PUT /auth/update-password` - set a new password without the old one
/// - `POST /auth/update-password` - change password given the current one
///
/// Sessions are stateless: logout only clears the cookie, and an issued
/// token stays valid until it expires.

use crate::{
    app::AppState,
    cookie::{clear_session_cookie, session_cookie},
    error::{validate, ApiResult},
    extract::ApiJson,
};
use axum::{extract::State, response::IntoResponse, Json};
use callcenter_shared::services::auth;
use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: String,
    pub is_first_login: bool,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub data: LoginData,
}

/// `PUT /auth/update-password` body
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// `POST /auth/update-password` body
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Current password
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[serde(default, rename = "newPassword")]
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Login endpoint
///
/// ```text
/// POST /auth/login
/// { "username": "operator1", "password": "..." }
/// ```
///
/// ```json
/// { "message": "Logged in successfully", "data": { "token": "eyJ...", "is_first_login": true } }
/// ```
///
/// An unknown username and a wrong password produce the same 401 body.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validate(&req)?;

    let session = auth::login(&state.db, state.jwt_secret(), &req.username, &req.password).await?;
    let cookie = session_cookie(&session.token, state.secure_cookies())?;

    Ok((
        [cookie],
        Json(LoginResponse {
            message: "Logged in successfully",
            data: LoginData {
                token: session.token,
                is_first_login: session.is_first_login,
            },
        }),
    ))
}

pub async fn logout() -> impl IntoResponse {
    ([clear_session_cookie()], Json(json!({ "message": "Logged out" })))
}

/// Password reset endpoint
///
/// Overwrites the password of `username`, clears the first-login flag and
/// reissues the session cookie.
pub async fn reset_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ResetPasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    validate(&req)?;

    let session =
        auth::reset_password(&state.db, state.jwt_secret(), &req.username, &req.password).await?;
    let cookie = session_cookie(&session.token, state.secure_cookies())?;

    Ok((
        [cookie],
        Json(json!({ "message": "Password updated successfully" })),
    ))
}

/// Password change endpoint
///
/// Behavior depends on `PASSWORD_CHANGE_MODE`; see
/// [`callcenter_shared::services::auth::PasswordChangeMode`].
pub async fn change_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    validate(&req)?;

    let session = auth::change_password(
        &state.db,
        state.jwt_secret(),
        state.password_change_mode(),
        &req.username,
        &req.password,
        &req.new_password,
    )
    .await?;
    let cookie = session_cookie(&session.token, state.secure_cookies())?;

    Ok((
        [cookie],
        Json(json!({ "message": "Password updated successfully" })),
    ))
}
