/// Authentication endpoints
///
/// - `POST /api/auth/login` - Exchange credentials for a bearer token
/// - `POST /api/auth/signup` - Register a new account with the User role

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use taskmanager_shared::{
    dto::auth::{LoginRequest, LoginResponse, SignupRequest},
    response::ResponseMessage,
};
use validator::Validate;

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "user@example.com",
///   "password": "secret"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJ...",
///     "userId": 2,
///     "email": "user@example.com",
///     "fullName": "Jane Doe",
///     "roleId": 2,
///     "expiresAt": "2024-01-01T01:00:00Z"
///   },
///   "message": "Login successful",
///   "statusCode": 200
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing username or password
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<ResponseMessage<LoginResponse>> {
    tracing::info!("Login request received");

    let Json(req) = body?;
    if req.validate().is_err() {
        tracing::warn!("Login request failed validation");
        return Err(ApiError::BadRequest("Invalid login request.".to_string()));
    }

    let response = state.services.auth.login(&req).await;
    tracing::info!(
        status_code = response.status_code(),
        "Login completed with status code"
    );
    Ok(response)
}

/// Signup endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/signup
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "secret",
///   "fullName": "Jane Doe"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Missing fields or email already registered
/// - `500 Internal Server Error`: Server error
pub async fn signup(
    State(state): State<AppState>,
    body: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<ResponseMessage<()>> {
    tracing::info!("Signup request received");

    let Json(req) = body?;
    if req.validate().is_err() {
        tracing::warn!("Signup request failed validation");
        return Err(ApiError::BadRequest("All fields are required.".to_string()));
    }

    let response = state.services.auth.signup(&req).await;
    tracing::info!(
        status_code = response.status_code(),
        "Signup completed with status code"
    );
    Ok(response)
}
