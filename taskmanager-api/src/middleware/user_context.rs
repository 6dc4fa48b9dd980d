/// Log enrichment with the caller's identity
///
/// Every event logged while a request is handled is recorded inside a
/// `user_context` span with `user_id` and `username` fields. Unauthenticated
/// requests are logged as `Anonymous`.
///
/// Must run inside the authentication layer so the `AuthContext` is already
/// attached when it executes.

use axum::{extract::Request, middleware::Next, response::Response};
use taskmanager_shared::auth::middleware::AuthContext;
use tracing::Instrument;

const ANONYMOUS: &str = "Anonymous";

/// `(user_id, username)` as they appear in logs
pub fn user_fields(context: Option<&AuthContext>) -> (String, String) {
    let Some(context) = context else {
        return (ANONYMOUS.to_string(), ANONYMOUS.to_string());
    };

    let user_id = context
        .user_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| ANONYMOUS.to_string());

    let username = match context.username() {
        "" => ANONYMOUS.to_string(),
        name => name.to_string(),
    };

    (user_id, username)
}

/// Runs the rest of the stack inside a span tagged with the caller
pub async fn log_user_context(req: Request, next: Next) -> Response {
    let (user_id, username) = user_fields(req.extensions().get::<AuthContext>());
    let span = tracing::info_span!("user_context", user_id = %user_id, username = %username);

    next.run(req).instrument(span).await
}
