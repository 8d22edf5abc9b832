/// Staff account administration

use sqlx::PgPool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::error::{ServiceError, ServiceResult};
use crate::models::pagination::{Page, Pagination};
use crate::models::user::{CreateUser, EmployeeRole, EmployeeRow, User};

/// Status given to accounts created without one
pub const DEFAULT_EMPLOYEE_STATUS: &str = "1";

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub username: String,
    pub name: String,

    /// `"0"` admin, `"1"` team lead, anything else operator
    pub user_role: Option<String>,

    pub status: Option<String>,
    pub team_id: i64,
}

/// Lists non-admin accounts
pub async fn list(pool: &PgPool, pagination: Pagination) -> ServiceResult<Page<EmployeeRow>> {
    let rows = User::list_employees(pool, pagination.limit, pagination.offset()).await?;
    let total = User::count_employees(pool).await?;

    Ok(Page::new(rows, total, pagination))
}

/// Creates an account whose initial password is its own username
///
/// The account starts with `is_first_login = true`, so the first login
/// prompts for a new password.
pub async fn create(pool: &PgPool, employee: NewEmployee) -> ServiceResult<User> {
    if employee.username.trim().is_empty() || employee.name.trim().is_empty() {
        return Err(ServiceError::invalid_argument(
            "Username, name, and team_id are required",
        ));
    }

    let status = employee
        .status
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EMPLOYEE_STATUS.to_string());

    let role = EmployeeRole::from_code(employee.user_role.as_deref());

    let user = User::create(
        pool,
        CreateUser {
            password_hash: hash_password(&employee.username)?,
            username: employee.username,
            name: employee.name,
            role,
            status,
            team_id: employee.team_id,
        },
    )
    .await?;

    info!(user_id = user.id, username = %user.username, ?role, "Employee created");
    Ok(user)
}

/// Forces a password change on the account's next login
pub async fn require_password_reset(pool: &PgPool, id: i64) -> ServiceResult<()> {
    if !User::require_password_change(pool, id).await? {
        return Err(ServiceError::NotFound("User"));
    }

    info!(user_id = id, "Password reset requested");
    Ok(())
}
