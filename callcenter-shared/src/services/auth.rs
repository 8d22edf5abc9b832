/// Login and password updates
///
/// Each successful call returns a freshly signed session token; the API layer
/// turns it into the `token` cookie.

use std::fmt;
use std::str::FromStr;

use sqlx::PgPool;
use tracing::{debug, info, warn};

use crate::auth::jwt::issue_session_token;
use crate::auth::password::{dummy_verify, hash_password, verify_password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::User;

/// A signed session for one user
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub is_first_login: bool,
}

impl Session {
    fn issue(user: &User, jwt_secret: &str) -> ServiceResult<Self> {
        Ok(Self {
            token: issue_session_token(user, jwt_secret)?,
            is_first_login: user.is_first_login,
        })
    }
}

/// How `POST /auth/update-password` treats the current password
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordChangeMode {
    /// Verify the current password, then store the new one
    #[default]
    Verified,

    /// Guard the update with `password = <fresh hash of the current password>`.
    /// A fresh salt never equals the stored hash, so nothing is written, but
    /// the caller still gets a success response.
    LegacyGuard,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown password change mode '{0}', expected 'verified' or 'legacy_guard'")]
pub struct UnknownPasswordChangeMode(pub String);

impl FromStr for PasswordChangeMode {
    type Err = UnknownPasswordChangeMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "verified" => Ok(PasswordChangeMode::Verified),
            "legacy_guard" => Ok(PasswordChangeMode::LegacyGuard),
            _ => Err(UnknownPasswordChangeMode(s.to_string())),
        }
    }
}

impl fmt::Display for PasswordChangeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordChangeMode::Verified => f.write_str("verified"),
            PasswordChangeMode::LegacyGuard => f.write_str("legacy_guard"),
        }
    }
}

/// Checks a username/password pair and issues a session
///
/// Unknown usernames still pay for one bcrypt verification, and both failure
/// paths return the same [`ServiceError::InvalidCredentials`].
pub async fn login(
    pool: &PgPool,
    jwt_secret: &str,
    username: &str,
    password: &str,
) -> ServiceResult<Session> {
    let Some(user) = User::find_by_username(pool, username).await? else {
        dummy_verify(password);
        debug!("Login failed: unknown username");
        return Err(ServiceError::InvalidCredentials);
    };

    if !verify_password(password, &user.password)? {
        warn!(user_id = user.id, "Login failed: wrong password");
        return Err(ServiceError::InvalidCredentials);
    }

    info!(user_id = user.id, username = %user.username, "User logged in");
    Session::issue(&user, jwt_secret)
}

/// Overwrites a user's password without asking for the old one
pub async fn reset_password(
    pool: &PgPool,
    jwt_secret: &str,
    username: &str,
    new_password: &str,
) -> ServiceResult<Session> {
    let mut user = User::find_by_username(pool, username)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    let new_hash = hash_password(new_password)?;
    User::set_password(pool, username, &new_hash).await?;

    user.password = new_hash;
    user.is_first_login = false;

    info!(user_id = user.id, "Password reset");
    Session::issue(&user, jwt_secret)
}

/// Changes a password given the current one, following `mode`
pub async fn change_password(
    pool: &PgPool,
    jwt_secret: &str,
    mode: PasswordChangeMode,
    username: &str,
    current_password: &str,
    new_password: &str,
) -> ServiceResult<Session> {
    let mut user = User::find_by_username(pool, username)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    let updated = match mode {
        PasswordChangeMode::Verified => {
            if !verify_password(current_password, &user.password)? {
                warn!(user_id = user.id, "Password change rejected: wrong current password");
                return Err(ServiceError::InvalidCredentials);
            }

            let new_hash = hash_password(new_password)?;
            let rows = User::set_password(pool, username, &new_hash).await?;
            if rows > 0 {
                user.password = new_hash;
            }
            rows
        }
        PasswordChangeMode::LegacyGuard => {
            let guard_hash = hash_password(current_password)?;
            let new_hash = hash_password(new_password)?;
            let rows =
                User::set_password_if_hash_matches(pool, username, &new_hash, &guard_hash).await?;
            if rows > 0 {
                user.password = new_hash;
            }
            rows
        }
    };

    if updated > 0 {
        user.is_first_login = false;
        info!(user_id = user.id, %mode, "Password changed");
    } else {
        warn!(user_id = user.id, %mode, "Password change matched no rows");
    }

    Session::issue(&user, jwt_secret)
}
