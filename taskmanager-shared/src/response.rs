/// Uniform response envelope
///
/// Every gateway and service operation returns a [`ResponseMessage`]. The
/// envelope is what travels back up through the layers and, at the HTTP edge,
/// becomes both the status code and the JSON body of the response.
///
/// # Wire format
///
/// ```json
/// {
///   "success": true,
///   "data": { "taskId": 7, "taskTitle": "Write report" },
///   "message": "Success",
///   "statusCode": 200
/// }
/// ```
///
/// # Invariant
///
/// `success` is `true` exactly when `statusCode` is 2xx. The fields are
/// private and the only way to build an envelope is through the named
/// constructors, each of which fixes the pairing.
///
/// # Example
///
/// ```
/// use taskmanager_shared::response::ResponseMessage;
///
/// let ok = ResponseMessage::ok(42, "Success");
/// assert!(ok.is_success());
/// assert_eq!(ok.status_code(), 200);
///
/// let missing: ResponseMessage<i32> = ResponseMessage::not_found("Task not found");
/// assert!(!missing.is_success());
/// assert_eq!(missing.status_code(), 404);
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Envelope wrapping every operation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMessage<T> {
    success: bool,
    data: Option<T>,
    message: String,
    status_code: u16,
}

impl<T> ResponseMessage<T> {
    fn new(success: bool, data: Option<T>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            success,
            data,
            message: message.into(),
            status_code,
        }
    }

    /// 200, success
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(true, Some(data), message, 200)
    }

    /// 200, success, no payload
    pub fn ok_empty(message: impl Into<String>) -> Self {
        Self::new(true, None, message, 200)
    }

    /// 201, success
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(true, Some(data), message, 201)
    }

    /// 201, success, no payload
    pub fn created_empty(message: impl Into<String>) -> Self {
        Self::new(true, None, message, 201)
    }

    /// 400, failure
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(false, None, message, 400)
    }

    /// 401, failure
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(false, None, message, 401)
    }

    /// 404, failure
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(false, None, message, 404)
    }

    /// 500, failure
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(false, None, message, 500)
    }

    /// Whether the operation succeeded
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// HTTP status code carried by the envelope
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Borrowed payload, if any
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Consumes the envelope and returns the payload
    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// Splits a successful envelope into its payload, or hands back the
    /// failure re-typed for the caller's payload type.
    ///
    /// A successful envelope without a payload is treated as a failure with
    /// its status preserved, since callers asking for data cannot proceed.
    pub fn into_result<U>(self) -> Result<T, ResponseMessage<U>> {
        let code = self.failure_code();
        match self.data {
            Some(data) if self.success => Ok(data),
            _ => Err(ResponseMessage::new(false, None, self.message, code)),
        }
    }

    /// Re-types a failure envelope, dropping any payload
    ///
    /// Successful envelopes are converted into a 500 since a success cannot
    /// be relayed without its payload.
    pub fn into_failure<U>(self) -> ResponseMessage<U> {
        let code = self.failure_code();
        ResponseMessage::new(false, None, self.message, code)
    }

    /// Maps the payload while keeping status and message
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ResponseMessage<U> {
        ResponseMessage {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            status_code: self.status_code,
        }
    }

    fn failure_code(&self) -> u16 {
        if self.success {
            500
        } else {
            self.status_code
        }
    }
}

impl<T: Serialize> IntoResponse for ResponseMessage<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
