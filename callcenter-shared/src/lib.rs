//! # Call Center Shared Library
//!
//! Domain types, SQL access and business operations used by the call-center
//! API server.
//!
//! ## Module Organization
//!
//! - `models`: database models and data structures
//! - `auth`: password hashing and session tokens
//! - `db`: connection pool and migrations
//! - `services`: one operation per endpoint
//! - `error`: the service error type

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
