/// Login and signup

use std::sync::Arc;

use tracing::{error, info};

use super::ServiceError;
use crate::auth::jwt::{create_token, Claims, JwtSettings};
use crate::auth::password::{hash_password, verify_password};
use crate::dto::auth::{LoginRequest, LoginResponse, SignupRequest};
use crate::dto::is_blank;
use crate::gateway::UserGateway;
use crate::models::reference::RoleKind;
use crate::models::user::{normalize_email, CreateUser, User};
use crate::response::ResponseMessage;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

pub struct AuthService {
    users: Arc<dyn UserGateway>,
    jwt: Arc<JwtSettings>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserGateway>, jwt: Arc<JwtSettings>) -> Self {
        Self { users, jwt }
    }

    /// Checks credentials and issues a bearer token
    ///
    /// Unknown users and wrong passwords get the same Unauthorized message.
    pub async fn login(&self, request: &LoginRequest) -> ResponseMessage<LoginResponse> {
        let email = normalize_email(&request.username);

        let user = match self.users.find_active_by_email(&email).await.into_result::<()>() {
            Ok(user) => user,
            Err(_) => return ResponseMessage::unauthorized(INVALID_CREDENTIALS),
        };

        match self.issue_token(&user, &request.password) {
            Ok(Some(response)) => {
                info!(user_id = user.id, "User logged in");
                ResponseMessage::ok(response, "Login successful")
            }
            Ok(None) => ResponseMessage::unauthorized(INVALID_CREDENTIALS),
            Err(e) => {
                error!(error = %e, "Login failed");
                ResponseMessage::error(e.to_string())
            }
        }
    }

    /// `None` when the password does not match
    fn issue_token(
        &self,
        user: &User,
        password: &str,
    ) -> Result<Option<LoginResponse>, ServiceError> {
        if !verify_password(password, &user.password_hash)? {
            return Ok(None);
        }

        let full_name = user.full_name.clone().unwrap_or_default();
        let claims = Claims::for_user(user.id, user.role_id, &user.email, &full_name, &self.jwt);
        let token = create_token(&claims, &self.jwt.secret)?;

        Ok(Some(LoginResponse {
            token,
            user_id: user.id,
            email: user.email.clone(),
            full_name,
            role_id: user.role_id,
            expires_at: claims.expires_at(),
        }))
    }

    /// Registers a new account with the User role
    pub async fn signup(&self, request: &SignupRequest) -> ResponseMessage<()> {
        let fields = [&request.email, &request.password, &request.full_name];
        if fields.iter().any(|field| is_blank(Some(field.as_str()))) {
            return ResponseMessage::bad_request("All fields are required");
        }

        let data = match new_account(request) {
            Ok(data) => data,
            Err(e) => {
                error!(error = %e, "Signup failed");
                return ResponseMessage::error(e.to_string());
            }
        };

        let created = self.users.create_if_absent(data).await;
        if created.is_success() {
            info!("User signed up");
            return ResponseMessage::created_empty("Signup successful. Please login to continue.");
        }

        if created.status_code() == 500 {
            created.into_failure()
        } else {
            ResponseMessage::bad_request(created.message())
        }
    }
}

/// Normalizes the email, splits the name and hashes the password
fn new_account(request: &SignupRequest) -> Result<CreateUser, ServiceError> {
    let full_name = request.full_name.trim();
    let (first_name, last_name) = full_name.split_once(' ').unwrap_or((full_name, ""));

    Ok(CreateUser {
        email: normalize_email(&request.email),
        password_hash: hash_password(&request.password)?,
        full_name: full_name.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role_id: RoleKind::User.id(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::validate_token;
    use crate::gateway::memory::MemoryStore;
    use chrono::Utc;

    fn settings() -> Arc<JwtSettings> {
        Arc::new(JwtSettings {
            secret: "test-secret-key-at-least-32-bytes-long".to_string(),
            issuer: "taskmanager".to_string(),
            audience: "taskmanager-clients".to_string(),
            expiration_minutes: 60,
        })
    }

    fn signup_request(email: &str, password: &str, full_name: &str) -> SignupRequest {
        SignupRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_signup_normalizes_email_and_splits_name() {
        let store = Arc::new(MemoryStore::seeded());
        let service = AuthService::new(store.clone(), settings());

        let response = service
            .signup(&signup_request("  A@B.com ", "secret", " Ada Love Lace "))
            .await;
        assert_eq!(response.status_code(), 201);
        assert_eq!(response.message(), "Signup successful. Please login to continue.");
        assert!(response.data().is_none());

        let user = store.user_by_email("a@b.com").await.unwrap();
        assert_eq!(user.first_name.as_deref(), Some("Ada"));
        assert_eq!(user.last_name.as_deref(), Some("Love Lace"));
        assert_eq!(user.role_id, RoleKind::User.id());
        assert_ne!(user.password_hash, "secret");
    }

    #[tokio::test]
    async fn test_signup_rejects_blank_fields() {
        let service = AuthService::new(Arc::new(MemoryStore::seeded()), settings());

        let response = service.signup(&signup_request("a@b.com", "  ", "Ada")).await;
        assert_eq!(response.status_code(), 400);
        assert_eq!(response.message(), "All fields are required");
    }

    #[tokio::test]
    async fn test_signup_duplicate_email() {
        let service = AuthService::new(Arc::new(MemoryStore::seeded()), settings());

        service.signup(&signup_request("a@b.com", "pw", "Ada")).await;
        let response = service.signup(&signup_request("A@B.COM", "pw", "Ada")).await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.message(), "Email already exists");
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let settings = settings();
        let service = AuthService::new(Arc::new(MemoryStore::seeded()), settings.clone());
        service.signup(&signup_request("a@b.com", "pw", "Ada Lovelace")).await;

        let response = service.login(&login_request(" A@b.com", "pw")).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.message(), "Login successful");

        let login = response.into_data().unwrap();
        assert_eq!(login.full_name, "Ada Lovelace");
        assert_eq!(login.role_id, RoleKind::User.id());
        assert!(login.expires_at > Utc::now());

        let claims = validate_token(&login.token, &settings).unwrap();
        assert_eq!(claims.user_id(), Some(login.user_id));
        assert_eq!(claims.role_id(), Some(RoleKind::User.id()));
    }

    #[tokio::test]
    async fn test_login_same_message_for_unknown_user_and_wrong_password() {
        let service = AuthService::new(Arc::new(MemoryStore::seeded()), settings());
        service.signup(&signup_request("a@b.com", "pw", "Ada")).await;

        let unknown = service.login(&login_request("nobody@b.com", "pw")).await;
        let wrong = service.login(&login_request("a@b.com", "nope")).await;

        assert_eq!(unknown.status_code(), 401);
        assert_eq!(wrong.status_code(), 401);
        assert_eq!(unknown.message(), "Invalid username or password");
        assert_eq!(unknown.message(), wrong.message());
    }

    #[tokio::test]
    async fn test_login_with_corrupt_hash_is_an_error() {
        let store = Arc::new(MemoryStore::seeded());
        store
            .insert_user(User {
                id: 0,
                email: "a@b.com".to_string(),
                full_name: None,
                first_name: None,
                last_name: None,
                password_hash: "plaintext".to_string(),
                role_id: RoleKind::User.id(),
                is_active: true,
                created_on: Utc::now(),
                updated_on: None,
            })
            .await;
        let service = AuthService::new(store, settings());

        let response = service.login(&login_request("a@b.com", "plaintext")).await;
        assert_eq!(response.status_code(), 500);
    }
}
