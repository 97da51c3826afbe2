/// Authentication and authorization primitives
///
/// This module provides the credential and role-check building blocks for
/// Foreman:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and temporary-password generation
/// - [`jwt`]: Bearer token creation and validation
/// - [`authorization`]: Director role checks behind an injectable lookup
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Bearer Tokens**: HS256 signing with a fixed 12-hour expiry
/// - **Constant-time Comparison**: Password verification never short-circuits
///
/// # Example
///
/// ```
/// use foreman_shared::auth::password::{hash_password, verify_password};
/// use foreman_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Bearer token round-trip
/// let claims = Claims::new(Uuid::new_v4(), "alice");
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// let validated = validate_token(&token, "secret-key-at-least-32-bytes-long!!")?;
/// assert_eq!(validated.username, "alice");
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod jwt;
pub mod password;
