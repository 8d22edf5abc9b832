/// Errors returned by the service layer
///
/// Every operation in [`crate::services`] returns `Result<T, ServiceError>`.
/// The API crate maps each variant onto an HTTP status; nothing in here knows
/// about HTTP.

use crate::auth::{jwt::JwtError, password::PasswordError};
use crate::models::customer::CustomerStatus;

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Message shared by every credential failure so responses can't be told apart
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing or malformed input
    #[error("{0}")]
    InvalidArgument(String),

    /// Unknown username or wrong password
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness violation or concurrent modification
    #[error("{0}")]
    Conflict(String),

    /// Status change not allowed by the transition table
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: CustomerStatus,
        to: CustomerStatus,
    },

    /// Unexpected database failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

impl ServiceError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        ServiceError::Conflict(msg.into())
    }
}

/// Unique violations become `Conflict`, foreign-key violations become
/// `InvalidArgument`, the rest stays a database error.
impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                let what = match db_err.constraint() {
                    Some("customers_phone_number_key") => "Phone number already exists".to_string(),
                    Some("teams_team_name_key") => "Team name already exists".to_string(),
                    Some("users_username_key") => "Username already exists".to_string(),
                    Some(other) => format!("Constraint violation: {}", other),
                    None => "Duplicate value".to_string(),
                };
                return ServiceError::Conflict(what);
            }

            if db_err.is_foreign_key_violation() {
                return ServiceError::InvalidArgument(format!(
                    "Referenced record does not exist ({})",
                    db_err.constraint().unwrap_or("foreign key")
                ));
            }
        }

        ServiceError::Database(err)
    }
}
