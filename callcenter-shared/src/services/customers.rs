/// Customer records and status transitions

use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::models::customer::{Attribution, Customer, CustomerFields, CustomerRow, CustomerStatus};
use crate::models::pagination::{Page, Pagination};

pub async fn list(pool: &PgPool, pagination: Pagination) -> ServiceResult<Page<CustomerRow>> {
    let rows = Customer::list(pool, pagination.limit, pagination.offset()).await?;
    let total = Customer::count(pool).await?;

    Ok(Page::new(rows, total, pagination))
}

/// Inserts a customer after checking the phone number is free
///
/// The unique index still backs the check, so a concurrent insert with the
/// same number also ends in [`ServiceError::Conflict`].
pub async fn create(pool: &PgPool, fields: CustomerFields) -> ServiceResult<Customer> {
    if fields.phone_number.trim().is_empty() {
        return Err(ServiceError::invalid_argument("Phone number is required"));
    }

    if Customer::phone_taken(pool, &fields.phone_number).await? {
        return Err(ServiceError::conflict("Phone number already exists"));
    }

    let customer = Customer::create(pool, &fields).await?;
    info!(customer_id = customer.id, created_by = ?fields.updated_by, "Customer created");

    Ok(customer)
}

/// Overwrites every field of an existing customer
///
/// `status` is stored as given; the transition table only governs
/// [`transition_status`].
pub async fn update(pool: &PgPool, id: i64, fields: CustomerFields) -> ServiceResult<Customer> {
    let customer = Customer::update(pool, id, &fields)
        .await?
        .ok_or(ServiceError::NotFound("Customer"))?;

    info!(customer_id = id, updated_by = ?fields.updated_by, "Customer updated");
    Ok(customer)
}

/// Current status of an existing customer
pub async fn current_status(pool: &PgPool, id: i64) -> ServiceResult<CustomerStatus> {
    Customer::current_status(pool, id)
        .await?
        .ok_or(ServiceError::NotFound("Customer"))
}

/// Moves a customer to `target` if the transition table allows it
///
/// Returns the status the customer had before. Reopening a closed record
/// clears `updated_by`; every other transition records `actor_id`.
pub async fn transition_status(
    pool: &PgPool,
    id: i64,
    target: CustomerStatus,
    actor_id: i64,
    actor_is_admin: bool,
) -> ServiceResult<CustomerStatus> {
    let current = current_status(pool, id).await?;

    let attribution = current
        .check_transition(target, actor_is_admin)
        .ok_or_else(|| {
            warn!(customer_id = id, from = %current, to = %target, actor_id, actor_is_admin,
                "Status transition rejected");
            ServiceError::InvalidTransition {
                from: current,
                to: target,
            }
        })?;

    let updated_by = match attribution {
        Attribution::Actor => Some(actor_id),
        Attribution::Cleared => None,
    };

    let rows = Customer::apply_status(pool, id, current, target, updated_by).await?;
    if rows == 0 {
        // Deleted or moved by someone else between the read and the write
        return match Customer::current_status(pool, id).await? {
            None => Err(ServiceError::NotFound("Customer")),
            Some(now) => {
                warn!(customer_id = id, expected = %current, found = %now,
                    "Status changed concurrently");
                Err(ServiceError::conflict(
                    "Customer status was changed by another user, reload and try again",
                ))
            }
        };
    }

    info!(customer_id = id, from = %current, to = %target, actor_id, "Customer status updated");
    Ok(current)
}

pub async fn delete(pool: &PgPool, id: i64) -> ServiceResult<()> {
    if !Customer::delete(pool, id).await? {
        return Err(ServiceError::NotFound("Customer"));
    }

    info!(customer_id = id, "Customer deleted");
    Ok(())
}
