/// Role model and per-user role assignments
///
/// Roles are plain named records; privilege is conferred by assignment.
/// Holding the role named "director" is what makes a user a director.
/// Assignments record who granted them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE roles (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE user_roles (
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role_id UUID NOT NULL REFERENCES roles(id) ON DELETE CASCADE,
///     granted_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     granted_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (user_id, role_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Named role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Role {
    /// Unique role ID
    pub id: Uuid,

    /// Role name, unique (e.g. "director")
    pub name: String,

    /// When the role was created
    pub created_at: DateTime<Utc>,
}

/// Assignment linking a user to a role
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRole {
    /// User holding the role
    pub user_id: Uuid,

    /// Role held
    pub role_id: Uuid,

    /// Who granted the assignment (nullable if the granter was deleted)
    pub granted_by: Option<Uuid>,

    /// When the assignment was granted
    pub granted_at: DateTime<Utc>,
}

impl Role {
    /// Finds a role by name
    ///
    /// Returns the role if found, None otherwise.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, name, created_at
            FROM roles
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(role)
    }

    /// Finds a role by name, creating it if absent
    ///
    /// The upsert form makes concurrent ensures of the same name converge
    /// on one row.
    pub async fn ensure(pool: &PgPool, name: &str) -> Result<Self, sqlx::Error> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (name)
            VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await?;

        Ok(role)
    }
}

impl UserRole {
    /// Assigns a role to a user, recording the granting identity
    ///
    /// Re-assigning an already-held role is a no-op.
    pub async fn assign(
        pool: &PgPool,
        user_id: Uuid,
        role_id: Uuid,
        granted_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO user_roles (user_id, role_id, granted_by)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .bind(granted_by)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Checks whether a user holds a role with the given name
    pub async fn exists(
        pool: &PgPool,
        user_id: Uuid,
        role_name: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM user_roles ur
                JOIN roles r ON r.id = ur.role_id
                WHERE ur.user_id = $1 AND r.name = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(role_name)
        .fetch_one(pool)
        .await?;

        Ok(exists)
    }

    /// Lists the roles a user holds
    pub async fn roles_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Role>, sqlx::Error> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name, r.created_at
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(roles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let role = Role {
            id: Uuid::new_v4(),
            name: "director".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&role).unwrap();
        assert!(json.contains("\"name\":\"director\""));
    }

    // Integration tests for database operations are in foreman-api/tests/
}
