/// Error handling for the API server
///
/// Handlers return `ApiResult<ResponseMessage<T>>`. Service outcomes,
/// successful or not, travel in the `Ok` envelope; `ApiError` covers what the
/// handler rejects before a service is reached (malformed input, missing
/// identity). Both render as the same `{success, data, message, statusCode}`
/// envelope.
///
/// # Example
///
/// ```
/// use taskmanager_api::error::{ApiError, ApiResult};
/// use taskmanager_shared::response::ResponseMessage;
///
/// fn check(task_id: i32) -> ApiResult<ResponseMessage<()>> {
///     if task_id <= 0 {
///         return Err(ApiError::BadRequest("Valid task ID is required".to_string()));
///     }
///     Ok(ResponseMessage::ok_empty("Success"))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    response::{IntoResponse, Response},
};
use taskmanager_shared::response::ResponseMessage;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Handler-level rejection
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Bad request (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unauthorized (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl ApiError {
    fn into_envelope(self) -> ResponseMessage<()> {
        match self {
            ApiError::BadRequest(msg) => {
                tracing::warn!(reason = %msg, "Request rejected");
                ResponseMessage::bad_request(msg)
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!(reason = %msg, "Request unauthorized");
                ResponseMessage::unauthorized(msg)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_envelope().into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}
