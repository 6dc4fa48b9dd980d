/// User model and database operations
///
/// Users are created on signup and never hard-deleted. Inactive users are
/// invisible to every lookup in this module, so they cannot log in or be
/// assigned tasks.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id SERIAL PRIMARY KEY,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     full_name VARCHAR(255),
///     first_name VARCHAR(100),
///     last_name VARCHAR(100),
///     password_hash VARCHAR(255) NOT NULL,
///     role_id INTEGER NOT NULL REFERENCES roles(id),
///     is_active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_on TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_on TIMESTAMPTZ
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskmanager_shared::models::user::{User, CreateUser};
/// use taskmanager_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "jane@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     full_name: "Jane Doe".to_string(),
///     first_name: "Jane".to_string(),
///     last_name: "Doe".to_string(),
///     role_id: 2,
/// }).await?;
///
/// let found = User::find_active_by_email(&pool, "jane@example.com").await?;
/// assert_eq!(found.map(|u| u.id), Some(user.id));
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

const USER_COLUMNS: &str = "id, email, full_name, first_name, last_name, password_hash, \
                            role_id, is_active, created_on, updated_on";

/// User account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// User id
    pub id: i32,

    /// Email address, stored trimmed and lowercased
    pub email: String,

    pub full_name: Option<String>,

    pub first_name: Option<String>,

    pub last_name: Option<String>,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Role reference (see [`RoleKind`](super::reference::RoleKind))
    pub role_id: i32,

    /// Inactive users cannot log in or be assigned work
    pub is_active: bool,

    pub created_on: DateTime<Utc>,

    pub updated_on: Option<DateTime<Utc>>,
}

impl User {
    /// Name shown next to tasks assigned to this user
    ///
    /// Full name, then email, then "Unknown"
    pub fn display_name(&self) -> String {
        [self.full_name.as_deref(), Some(self.email.as_str())]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty())
            .unwrap_or("Unknown")
            .to_string()
    }
}

/// Input for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Normalized email address
    pub email: String,

    /// Argon2id hash, never the plaintext password
    pub password_hash: String,

    pub full_name: String,

    pub first_name: String,

    pub last_name: String,

    pub role_id: i32,
}

impl User {
    /// Inserts a new active user
    ///
    /// # Errors
    ///
    /// Returns a database error if the email is already taken (unique
    /// constraint `users_email_key`) or the connection fails.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let query = format!(
            r#"
            INSERT INTO users
                (email, password_hash, full_name, first_name, last_name, role_id,
                 is_active, created_on)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, NOW())
            RETURNING {USER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, User>(&query)
            .bind(data.email)
            .bind(data.password_hash)
            .bind(data.full_name)
            .bind(data.first_name)
            .bind(data.last_name)
            .bind(data.role_id)
            .fetch_one(pool)
            .await
    }

    /// Checks whether any user, active or not, already owns the email
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Finds an active user by id
    pub async fn find_active_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_active = TRUE");

        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds an active user by email
    ///
    /// The comparison is exact; callers normalize the email first.
    pub async fn find_active_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let query =
            format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 AND is_active = TRUE");

        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }
}

/// Normalizes an email for storage and lookup (trim + lowercase)
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
