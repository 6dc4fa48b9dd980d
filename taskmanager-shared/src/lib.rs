//! # Task Manager Shared Library
//!
//! Domain layer of the task manager: everything below the HTTP handlers.
//!
//! ## Module Organization
//!
//! - `response`: the uniform `{success, data, message, statusCode}` envelope
//! - `models`: table rows and their SQL
//! - `gateway`: per-entity persistence traits with Postgres and in-memory stores
//! - `services`: auth, task and configuration rules
//! - `dto`: request and response bodies
//! - `auth`: password hashing, bearer tokens, request authentication
//! - `db`: connection pool

pub mod auth;
pub mod db;
pub mod dto;
pub mod gateway;
pub mod models;
pub mod response;
pub mod services;

/// Current version of the shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
