//! # Task Manager API Server Library
//!
//! This library provides the HTTP surface of the task manager: the router,
//! request handlers, configuration and middleware. Domain logic lives in
//! `taskmanager-shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Handler-level rejections rendered as envelopes
//! - `middleware`: User-context logging and panic recovery
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
