/// Director-only account management endpoints
///
/// # Endpoints
///
/// - `POST /api/admin/users` - Create an account directly
/// - `POST /api/admin/users/:id/approve` - Approve a pending registration
///
/// Both require the acting user to hold the director role.

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use foreman_shared::{
    auth::{authorization::require_director, password},
    models::{
        role::{Role, UserRole},
        user::{CreateUser, User, UserStatus},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Username (must be unique)
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "username is required"))]
    pub username: String,

    /// Optional display name
    #[validate(length(max = 255, message = "display_name must be at most 255 characters"))]
    pub display_name: Option<String>,

    /// Explicit temporary password; generated randomly if absent
    pub temp_password: Option<String>,

    /// Role to assign, created if it does not exist yet
    pub role: Option<String>,

    /// Whether the account starts active instead of pending
    #[serde(default)]
    pub make_active: bool,
}

/// Create user response
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    /// Always true on success
    pub ok: bool,

    /// New user ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Approval state
    pub status: UserStatus,
}

/// Approve user response
#[derive(Debug, Serialize)]
pub struct ApproveUserResponse {
    /// Always true on success
    pub ok: bool,
}

/// Create an account directly
///
/// A director can provision accounts without the self-registration flow.
/// When an explicit temporary password is supplied the account is flagged
/// to rotate it on first login; a generated password is treated as
/// handed over out of band and carries no flag.
///
/// # Endpoint
///
/// ```text
/// POST /api/admin/users
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "username": "bob",
///   "display_name": "Bob",
///   "temp_password": "changeme-now",
///   "role": "director",
///   "make_active": true
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing username, or username taken
/// - `403 Forbidden`: acting user is not a director
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<Json<CreateUserResponse>> {
    require_director(&state.db, auth.id).await?;
    req.validate()?;

    let explicit_temp = req.temp_password.is_some();
    let plain_password = req
        .temp_password
        .unwrap_or_else(password::generate_temp_password);
    let password_hash = password::hash_password(&plain_password)?;

    let status = if req.make_active {
        UserStatus::Active
    } else {
        UserStatus::Pending
    };

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            display_name: req.display_name,
            password_hash,
            status,
            force_password_change: explicit_temp,
            employee_id: None,
        },
    )
    .await?;

    if let Some(role_name) = req.role {
        let role = Role::ensure(&state.db, &role_name).await?;
        UserRole::assign(&state.db, user.id, role.id, auth.id).await?;
    }

    tracing::info!(
        username = %user.username,
        created_by = %auth.username,
        status = user.status.as_str(),
        "user created by director"
    );

    Ok(Json(CreateUserResponse {
        ok: true,
        id: user.id,
        username: user.username,
        status: user.status,
    }))
}

/// Approve a pending registration
///
/// Activates the account; approving an already-active account is a no-op
/// that still reports success.
///
/// # Endpoint
///
/// ```text
/// POST /api/admin/users/:id/approve
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: acting user is not a director
/// - `404 Not Found`: no user with that ID
pub async fn approve_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<ApproveUserResponse>> {
    require_director(&state.db, auth.id).await?;

    let found = User::activate(&state.db, user_id).await?;
    if !found {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %user_id, approved_by = %auth.username, "user approved");

    Ok(Json(ApproveUserResponse { ok: true }))
}
