/// Database models
///
/// Each model owns its SQL. Row structs map straight onto tables; listing
/// rows (`*Row`) carry audit references already resolved to usernames.
///
/// # Models
///
/// - `user`: staff accounts
/// - `team`: operator teams
/// - `customer`: caller records and the status state machine
/// - `statistics`: per-team call counts
/// - `pagination`: page/limit parsing and the paged response envelope
///
/// # Example
///
/// ```no_run
/// use callcenter_shared::models::customer::{Customer, CustomerFields, CustomerStatus};
/// use callcenter_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let customer = Customer::create(&pool, &CustomerFields {
///     full_name: Some("Jane Caller".to_string()),
///     year_of_birth: Some(1990),
///     phone_number: "0901234567".to_string(),
///     note: None,
///     role_note: Some("sales".to_string()),
///     status: CustomerStatus::New,
///     team_id: None,
///     updated_by: None,
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```

pub mod customer;
pub mod pagination;
pub mod statistics;
pub mod team;
pub mod user;
