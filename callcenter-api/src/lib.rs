//! # Call Center API Server Library
//!
//! HTTP surface of the call-center backend: configuration, router, request
//! parsing and error mapping. Business logic lives in `callcenter-shared`.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `config`: configuration management
//! - `cookie`: the session cookie
//! - `error`: error handling and HTTP response mapping
//! - `extract`: JSON body extractor with API-shaped rejections
//! - `middleware`: security headers
//! - `routes`: route handlers

pub mod app;
pub mod config;
pub mod cookie;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
