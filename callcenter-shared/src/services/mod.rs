/// Business operations, one function per endpoint
///
/// Functions take the pool as `&PgPool`, do their own existence and
/// uniqueness checks, log what changed, and return [`crate::error::ServiceError`]
/// values for the API layer to map.
///
/// # Example
///
/// ```no_run
/// use callcenter_shared::models::customer::CustomerStatus;
/// use callcenter_shared::services::customers;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// // Operator 7 claims customer 42
/// let previous = customers::transition_status(&pool, 42, CustomerStatus::InProgress, 7, false).await?;
/// assert_eq!(previous, CustomerStatus::New);
/// # Ok(())
/// # }
/// ```

pub mod auth;
pub mod customers;
pub mod employees;
pub mod statistics;
pub mod teams;
