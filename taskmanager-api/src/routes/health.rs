/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": { "status": "healthy", "version": "0.1.0" },
///   "message": "Success",
///   "statusCode": 200
/// }
/// ```

use serde::{Deserialize, Serialize};
use taskmanager_shared::response::ResponseMessage;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,
}

/// Health check handler
pub async fn health_check() -> ResponseMessage<HealthResponse> {
    ResponseMessage::ok(
        HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        "Success",
    )
}
