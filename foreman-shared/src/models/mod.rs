/// Database models for Foreman
///
/// This module contains all database models and their operations.
///
/// # Models
///
/// - `user`: User accounts and the pending/active approval state
/// - `role`: Named roles and per-user role assignments
/// - `task`: Assigned tasks and the director approval state
///
/// # Example
///
/// ```no_run
/// use foreman_shared::models::user::{CreateUser, User, UserStatus};
/// use foreman_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     username: "alice".to_string(),
///     display_name: None,
///     password_hash: "$argon2id$...".to_string(),
///     status: UserStatus::Pending,
///     force_password_change: false,
///     employee_id: None,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod role;
pub mod task;
pub mod user;
