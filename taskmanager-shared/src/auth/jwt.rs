/// Bearer token issuance and validation
///
/// Tokens are HS256-signed JWTs. Besides the registered claims they carry the
/// two identity claims every protected route depends on: `sub` (user id) and
/// `role` (role id). Both are encoded as strings; a token whose claims do not
/// parse as integers is treated as lacking them.
///
/// # Example
///
/// ```
/// use taskmanager_shared::auth::jwt::{create_token, validate_token, Claims, JwtSettings};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = JwtSettings {
///     secret: "a-secret-that-is-at-least-32-bytes-long".to_string(),
///     issuer: "taskmanager".to_string(),
///     audience: "taskmanager-clients".to_string(),
///     expiration_minutes: 60,
/// };
///
/// let claims = Claims::for_user(7, 2, "jane@example.com", "Jane Doe", &settings);
/// let token = create_token(&claims, &settings.secret)?;
///
/// let validated = validate_token(&token, &settings)?;
/// assert_eq!(validated.user_id(), Some(7));
/// assert_eq!(validated.role_id(), Some(2));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Error type for JWT operations
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    /// Failed to create token
    #[error("Failed to create token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Token has expired")]
    Expired,

    /// Issuer or audience does not match the configuration
    #[error("Token was not issued for this service")]
    WrongIssuer,
}

/// Longest accepted token lifetime: one year
pub const MAX_EXPIRATION_MINUTES: i64 = 365 * 24 * 60;

/// Signing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    /// HMAC secret, at least 32 bytes
    pub secret: String,

    /// Expected `iss`
    pub issuer: String,

    /// Expected `aud`
    pub audience: String,

    /// Token lifetime
    pub expiration_minutes: i64,
}

impl JwtSettings {
    /// Token lifetime as a duration, capped at [`MAX_EXPIRATION_MINUTES`]
    pub fn lifetime(&self) -> Duration {
        Duration::minutes(self.expiration_minutes.clamp(0, MAX_EXPIRATION_MINUTES))
    }
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - user id
    pub sub: String,

    /// Role id
    pub role: String,

    pub email: String,

    /// Full name
    pub name: String,

    pub iss: String,

    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Builds claims for a user with the configured lifetime
    pub fn for_user(
        user_id: i32,
        role_id: i32,
        email: &str,
        full_name: &str,
        settings: &JwtSettings,
    ) -> Self {
        Self::with_expiration(user_id, role_id, email, full_name, settings, settings.lifetime())
    }

    /// Builds claims with an explicit lifetime
    pub fn with_expiration(
        user_id: i32,
        role_id: i32,
        email: &str,
        full_name: &str,
        settings: &JwtSettings,
        expires_in: Duration,
    ) -> Self {
        let now = Utc::now();

        Self {
            sub: user_id.to_string(),
            role: role_id.to_string(),
            email: email.to_string(),
            name: full_name.to_string(),
            iss: settings.issuer.clone(),
            aud: settings.audience.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: (now + expires_in).timestamp(),
        }
    }

    /// Subject claim as a user id
    pub fn user_id(&self) -> Option<i32> {
        self.sub.parse().ok()
    }

    /// Role claim as a role id
    pub fn role_id(&self) -> Option<i32> {
        self.role.parse().ok()
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

/// Signs claims into a compact JWT
///
/// # Errors
///
/// Returns `JwtError::CreateError` if encoding fails
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| JwtError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates signature, lifetime, issuer and audience, then returns the claims
///
/// # Errors
///
/// - `JwtError::Expired` when `exp` has passed
/// - `JwtError::WrongIssuer` when `iss` or `aud` do not match
/// - `JwtError::ValidationError` for anything else (bad signature, garbage)
pub fn validate_token(token: &str, settings: &JwtSettings) -> Result<Claims, JwtError> {
    let key = DecodingKey::from_secret(settings.secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[settings.issuer.as_str()]);
    validation.set_audience(&[settings.audience.as_str()]);
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer
        | jsonwebtoken::errors::ErrorKind::InvalidAudience => JwtError::WrongIssuer,
        _ => JwtError::ValidationError(format!("Token validation failed: {}", e)),
    })?;

    Ok(token_data.claims)
}
