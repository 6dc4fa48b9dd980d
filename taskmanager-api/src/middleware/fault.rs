/// Last-resort fault handler
///
/// Installed through `tower_http::catch_panic::CatchPanicLayer`. The panic
/// payload is logged server-side; the client only ever sees the generic
/// "Internal server error." envelope.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use taskmanager_shared::response::ResponseMessage;

/// Builds the 500 envelope for a panic raised while serving a request
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Unhandled exception while serving request");

    ResponseMessage::<()>::error("Internal server error.").into_response()
}
