/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: bearer token issuance and validation
/// - [`middleware`]: request authentication layers and the caller identity
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::auth::password::{hash_password, verify_password};
/// use taskmanager_shared::auth::jwt::{create_token, Claims, JwtSettings};
///
/// # fn example(settings: JwtSettings) -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::for_user(1, 1, "admin@example.com", "Admin", &settings);
/// let token = create_token(&claims, &settings.secret)?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod middleware;
pub mod password;
