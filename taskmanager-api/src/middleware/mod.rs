/// Middleware modules for the API server
///
/// - `user_context`: wraps each request in a span carrying the caller's identity
/// - `fault`: turns a panic inside a handler into a 500 envelope
///
/// Token validation itself lives in `taskmanager_shared::auth::middleware`.

pub mod fault;
pub mod user_context;
