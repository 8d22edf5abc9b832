/// Middleware for the API server
///
/// - `security`: response security headers
/// - `timeout`: JSON body for timed-out requests

pub mod security;
pub mod timeout;
