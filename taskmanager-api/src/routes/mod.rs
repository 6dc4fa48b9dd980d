/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Login and signup
/// - `configuration`: Priority and status reference lists
/// - `task`: Task CRUD, dashboard and profile

pub mod auth;
pub mod configuration;
pub mod health;
pub mod task;
