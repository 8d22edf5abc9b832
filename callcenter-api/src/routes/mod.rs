/// API route handlers, organized by resource
///
/// - `health`: health check
/// - `auth`: login, logout, password updates
/// - `customers`: customer records and status transitions
/// - `employees`: staff accounts
/// - `teams`: teams
/// - `statistics`: call counts
/// - `params`: request pieces shared by the handlers

pub mod auth;
pub mod customers;
pub mod employees;
pub mod health;
pub mod params;
pub mod statistics;
pub mod teams;
