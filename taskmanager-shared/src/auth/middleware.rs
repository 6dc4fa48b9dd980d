/// Bearer authentication middleware for Axum
///
/// Two layers cooperate:
///
/// - [`authenticate`] runs on every request. When the `Authorization: Bearer`
///   header carries a valid token it adds an [`AuthContext`] to the request
///   extensions; otherwise it lets the request through untouched so public
///   routes keep working.
/// - [`require_auth`] guards protected routes and answers with a 401 envelope
///   ("Invalid token") when no context was attached.
///
/// Handlers read the context with `Option<Extension<AuthContext>>` and turn it
/// into an [`Identity`] before calling a service.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{middleware, routing::get, Extension, Router};
/// use taskmanager_shared::auth::jwt::JwtSettings;
/// use taskmanager_shared::auth::middleware::{create_auth_middleware, require_auth, AuthContext};
///
/// async fn whoami(Extension(auth): Extension<AuthContext>) -> String {
///     format!("{:?}", auth.user_id)
/// }
///
/// # fn build(settings: JwtSettings) -> Router {
/// Router::new()
///     .route("/me", get(whoami))
///     .route_layer(middleware::from_fn(require_auth))
///     .layer(middleware::from_fn(create_auth_middleware(Arc::new(settings))))
/// # }
/// ```

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use super::jwt::{validate_token, Claims, JwtSettings};
use crate::models::reference::RoleKind;
use crate::response::ResponseMessage;

/// Caller identity handed to service operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i32,
    pub role_id: i32,
}

impl Identity {
    pub fn new(user_id: i32, role_id: i32) -> Self {
        Self { user_id, role_id }
    }

    /// Whether the caller holds the Admin role
    pub fn is_admin(&self) -> bool {
        RoleKind::from_id(self.role_id) == Some(RoleKind::Admin)
    }
}

/// Authentication context added to request extensions
///
/// The id claims are optional: a correctly signed token whose `sub` or `role`
/// does not parse still authenticates, and the handler decides how to reject
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: Option<i32>,

    pub role_id: Option<i32>,

    pub email: String,

    /// Full name from the `name` claim
    pub name: String,
}

impl AuthContext {
    /// Creates auth context from validated claims
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id(),
            role_id: claims.role_id(),
            email: claims.email.clone(),
            name: claims.name.clone(),
        }
    }

    /// Identity, when both id claims are present
    pub fn identity(&self) -> Option<Identity> {
        Some(Identity::new(self.user_id?, self.role_id?))
    }

    /// Whether the role claim parsed to Admin; a missing role is not
    pub fn is_admin(&self) -> bool {
        self.role_id.and_then(RoleKind::from_id) == Some(RoleKind::Admin)
    }

    /// Name used for log enrichment
    pub fn username(&self) -> &str {
        if !self.name.is_empty() {
            &self.name
        } else {
            &self.email
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Attaches an [`AuthContext`] when the request carries a valid bearer token
pub async fn authenticate(settings: Arc<JwtSettings>, mut req: Request, next: Next) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        match validate_token(token, &settings) {
            Ok(claims) => {
                let context = AuthContext::from_claims(&claims);
                req.extensions_mut().insert(context);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
            }
        }
    }

    next.run(req).await
}

/// Rejects requests that [`authenticate`] did not mark as authenticated
pub async fn require_auth(req: Request, next: Next) -> Result<Response, ResponseMessage<()>> {
    if req.extensions().get::<AuthContext>().is_none() {
        return Err(ResponseMessage::unauthorized("Invalid token"));
    }

    Ok(next.run(req).await)
}

/// Creates an authentication middleware closure
///
/// Helper that captures the JWT settings for use with
/// `axum::middleware::from_fn`.
pub fn create_auth_middleware(
    settings: Arc<JwtSettings>,
) -> impl Fn(Request, Next) -> std::pin::Pin<Box<dyn std::future::Future<Output = Response> + Send>>
       + Clone {
    move |req, next| {
        let settings = settings.clone();
        Box::pin(authenticate(settings, req, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn settings() -> JwtSettings {
        JwtSettings {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            issuer: "taskmanager".to_string(),
            audience: "taskmanager-clients".to_string(),
            expiration_minutes: 60,
        }
    }

    #[test]
    fn test_auth_context_from_claims() {
        let claims = Claims::for_user(4, 2, "a@b.com", "Ann Bee", &settings());
        let context = AuthContext::from_claims(&claims);

        assert_eq!(context.identity(), Some(Identity::new(4, 2)));
        assert_eq!(context.username(), "Ann Bee");
    }

    #[test]
    fn test_identity_requires_both_claims() {
        let mut claims = Claims::for_user(4, 2, "a@b.com", "", &settings());
        claims.role = "admin".to_string();
        let context = AuthContext::from_claims(&claims);

        assert_eq!(context.user_id, Some(4));
        assert_eq!(context.identity(), None);
        assert_eq!(context.username(), "a@b.com");
    }

    #[test]
    fn test_admin_requires_parsed_admin_role() {
        let mut claims = Claims::for_user(1, RoleKind::Admin.id(), "a@b.com", "A", &settings());
        assert!(AuthContext::from_claims(&claims).is_admin());

        claims.role = String::new();
        let context = AuthContext::from_claims(&claims);
        assert_eq!(context.role_id, None);
        assert!(!context.is_admin());

        claims.role = RoleKind::User.id().to_string();
        assert!(!AuthContext::from_claims(&claims).is_admin());
    }

    #[test]
    fn test_identity_is_admin() {
        assert!(Identity::new(1, RoleKind::Admin.id()).is_admin());
        assert!(!Identity::new(2, RoleKind::User.id()).is_admin());
        assert!(!Identity::new(3, 99).is_admin());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
