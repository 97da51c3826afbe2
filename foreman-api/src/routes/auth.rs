/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new (unapproved) account
/// - `POST /api/auth/login` - Authenticate and receive a bearer token
///
/// Registration never grants roles and never activates the account;
/// a director has to approve it before login succeeds.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use foreman_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, PublicUser, User, UserStatus},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Username (must be unique)
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "username is required"))]
    pub username: String,

    /// Password
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 255, message = "display_name must be at most 255 characters"))]
    pub display_name: Option<String>,

    /// Optional employee reference
    pub employee_id: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// User ID
    pub id: Uuid,

    /// Username
    pub username: String,

    /// Approval state (always "pending" for self-registration)
    pub status: UserStatus,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Username
    #[serde(default)]
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,

    /// Password
    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Bearer token (12-hour expiry)
    pub token: String,

    /// Sanitized user view
    pub user: PublicUser,
}

/// Register a new user
///
/// The account lands in `pending` status; no roles are assigned.
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "correct horse battery staple",
///   "display_name": "Alice",
///   "employee_id": "E-1042"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing username/password, or username taken
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            display_name: req.display_name,
            password_hash,
            status: UserStatus::Pending,
            force_password_change: false,
            employee_id: req.employee_id,
        },
    )
    .await?;

    tracing::info!(username = %user.username, "user registered, awaiting approval");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            username: user.username,
            status: user.status,
        }),
    ))
}

/// Login and receive a bearer token
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "correct horse battery staple"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: unknown username or wrong password
/// - `403 Forbidden`: account not yet approved
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or(ApiError::UnknownUser)?;

    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    // Credential check comes first so an unapproved account still has to
    // present the right password before learning its approval state
    if !user.status.can_login() {
        return Err(ApiError::NotApproved);
    }

    User::update_last_login(&state.db, user.id).await?;

    let claims = jwt::Claims::new(user.id, user.username.clone());
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        token,
        user: PublicUser::from(&user),
    }))
}
