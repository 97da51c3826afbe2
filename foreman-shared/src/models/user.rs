/// User model and database operations
///
/// Users carry the pending/active approval state: self-registered accounts
/// land in `pending` and stay unable to log in until a director activates
/// them. Password hashes never serialize; external callers only ever see
/// the sanitized [`PublicUser`] view.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_status AS ENUM ('pending', 'active');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(255) NOT NULL UNIQUE,
///     display_name VARCHAR(255),
///     password_hash VARCHAR(255) NOT NULL,
///     status user_status NOT NULL DEFAULT 'pending',
///     force_password_change BOOLEAN NOT NULL DEFAULT FALSE,
///     employee_id VARCHAR(255),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// # State Machine
///
/// ```text
/// pending → active   (director approval, or created active by a director)
/// ```
///
/// No transition leaves `active`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Approval state of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Registered but not yet approved by a director
    Pending,

    /// Approved; may log in
    Active,
}

impl UserStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Pending => "pending",
            UserStatus::Active => "active",
        }
    }

    /// Only active accounts may authenticate
    pub fn can_login(&self) -> bool {
        matches!(self, UserStatus::Active)
    }
}

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Username, unique across all users
    pub username: String,

    /// Optional display name
    pub display_name: Option<String>,

    /// Argon2id password hash; never serialized
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Approval state
    pub status: UserStatus,

    /// Set when the account was created with an explicit temporary password
    pub force_password_change: bool,

    /// Optional opaque employee reference
    pub employee_id: Option<String>,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Sanitized user view safe to return to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Optional display name
    pub display_name: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            display_name: user.display_name.clone(),
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Username (must be unique)
    pub username: String,

    /// Optional display name
    pub display_name: Option<String>,

    /// Argon2id password hash (NOT a plaintext password)
    pub password_hash: String,

    /// Initial approval state
    pub status: UserStatus,

    /// Whether the first login must rotate the password
    pub force_password_change: bool,

    /// Optional employee reference
    pub employee_id: Option<String>,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Username already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, display_name, password_hash, status,
                               force_password_change, employee_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, username, display_name, password_hash, status,
                      force_password_change, employee_id,
                      created_at, updated_at, last_login_at
            "#,
        )
        .bind(data.username)
        .bind(data.display_name)
        .bind(data.password_hash)
        .bind(data.status)
        .bind(data.force_password_change)
        .bind(data.employee_id)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// Returns the user if found, None otherwise.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, display_name, password_hash, status,
                   force_password_change, employee_id,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by username
    ///
    /// Returns the user if found, None otherwise.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, display_name, password_hash, status,
                   force_password_change, employee_id,
                   created_at, updated_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Activates a pending user
    ///
    /// The only status transition that exists. Activating an already-active
    /// user is a no-op that still reports success.
    ///
    /// # Returns
    ///
    /// True if the user exists, false otherwise
    pub async fn activate(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET status = 'active', updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Stamps the last-login timestamp after successful authentication
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(UserStatus::Pending.as_str(), "pending");
        assert_eq!(UserStatus::Active.as_str(), "active");
    }

    #[test]
    fn test_only_active_can_login() {
        assert!(!UserStatus::Pending.can_login());
        assert!(UserStatus::Active.can_login());
    }

    #[test]
    fn test_public_user_strips_credentials() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            display_name: Some("Alice".to_string()),
            password_hash: "$argon2id$secret".to_string(),
            status: UserStatus::Active,
            force_password_change: false,
            employee_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let public = PublicUser::from(&user);
        let json = serde_json::to_string(&public).unwrap();

        assert!(json.contains("alice"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_user_serialization_skips_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "bob".to_string(),
            display_name: None,
            password_hash: "$argon2id$secret".to_string(),
            status: UserStatus::Pending,
            force_password_change: true,
            employee_id: Some("E-1042".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let json = serde_json::to_string(&user).unwrap();

        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"status\":\"pending\""));
    }

    // Integration tests for database operations are in foreman-api/tests/
}
