/// Director role checks
///
/// Every mutating operation in Foreman is gated on one question: is the
/// acting user a director? The check lives behind the [`DirectorLookup`]
/// trait so the decision logic can be exercised against a fake store in
/// tests while production code uses the `PgPool` implementation.
///
/// # Example
///
/// ```no_run
/// use foreman_shared::auth::authorization::require_director;
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// async fn approve_something(pool: &PgPool, actor_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
///     require_director(pool, actor_id).await?;
///     // ... actor is a director, proceed
///     Ok(())
/// }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::role::UserRole;

/// Name of the privileged role
pub const DIRECTOR_ROLE: &str = "director";

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Acting user does not hold the director role
    #[error("Director role required")]
    NotDirector,

    /// Acting user is neither the target user nor a director
    #[error("Not authorized to access this resource")]
    NotAuthorized,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Capability to answer "does this user hold the director role?"
///
/// Implemented for `PgPool` (a role-assignment lookup) and by fakes in
/// tests. Handlers and helpers take `&impl DirectorLookup` so they never
/// issue ad-hoc role queries themselves.
#[async_trait]
pub trait DirectorLookup: Send + Sync {
    /// Membership test over role assignments; pure lookup, no side effects
    async fn is_director(&self, user_id: Uuid) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl DirectorLookup for PgPool {
    async fn is_director(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
        UserRole::exists(self, user_id, DIRECTOR_ROLE).await
    }
}

/// Requires that the acting user holds the director role
///
/// # Errors
///
/// - `AuthzError::NotDirector` if the user does not hold the role
/// - `AuthzError::DatabaseError` if the lookup fails
pub async fn require_director(
    lookup: &impl DirectorLookup,
    user_id: Uuid,
) -> Result<(), AuthzError> {
    if !lookup.is_director(user_id).await? {
        return Err(AuthzError::NotDirector);
    }

    Ok(())
}

/// Requires that the actor is the target user or a director
///
/// Users may always read their own resources; directors may read anyone's.
///
/// # Errors
///
/// - `AuthzError::NotAuthorized` if the actor is neither
/// - `AuthzError::DatabaseError` if the lookup fails
pub async fn require_self_or_director(
    lookup: &impl DirectorLookup,
    actor_id: Uuid,
    target_id: Uuid,
) -> Result<(), AuthzError> {
    if actor_id == target_id {
        return Ok(());
    }

    if !lookup.is_director(actor_id).await? {
        return Err(AuthzError::NotAuthorized);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory lookup standing in for the role-assignment store
    struct FakeDirectory {
        directors: Vec<Uuid>,
    }

    #[async_trait]
    impl DirectorLookup for FakeDirectory {
        async fn is_director(&self, user_id: Uuid) -> Result<bool, sqlx::Error> {
            Ok(self.directors.contains(&user_id))
        }
    }

    #[tokio::test]
    async fn test_require_director_passes_for_director() {
        let director = Uuid::new_v4();
        let directory = FakeDirectory {
            directors: vec![director],
        };

        assert!(require_director(&directory, director).await.is_ok());
    }

    #[tokio::test]
    async fn test_require_director_rejects_regular_user() {
        let directory = FakeDirectory {
            directors: vec![Uuid::new_v4()],
        };

        let result = require_director(&directory, Uuid::new_v4()).await;
        assert!(matches!(result, Err(AuthzError::NotDirector)));
    }

    #[tokio::test]
    async fn test_require_self_or_director_allows_self() {
        let user = Uuid::new_v4();
        let directory = FakeDirectory { directors: vec![] };

        assert!(require_self_or_director(&directory, user, user)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_require_self_or_director_allows_director_for_other() {
        let director = Uuid::new_v4();
        let other = Uuid::new_v4();
        let directory = FakeDirectory {
            directors: vec![director],
        };

        assert!(require_self_or_director(&directory, director, other)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_require_self_or_director_rejects_other() {
        let actor = Uuid::new_v4();
        let other = Uuid::new_v4();
        let directory = FakeDirectory { directors: vec![] };

        let result = require_self_or_director(&directory, actor, other).await;
        assert!(matches!(result, Err(AuthzError::NotAuthorized)));
    }

    #[test]
    fn test_authz_error_display() {
        assert!(AuthzError::NotDirector.to_string().contains("Director"));
        assert!(AuthzError::NotAuthorized
            .to_string()
            .contains("Not authorized"));
    }
}
