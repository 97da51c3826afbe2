/// Error handling for the API server
///
/// One unified error type maps every failure in the system to an HTTP
/// response. Handlers return `Result<T, ApiError>`; conversions from the
/// shared error types keep `?` working throughout.
///
/// # Taxonomy
///
/// | Variant            | Status | Reason string        |
/// |--------------------|--------|----------------------|
/// | Validation         | 400    | `validation_error`   |
/// | Conflict           | 400    | `conflict`           |
/// | UnknownUser        | 400    | `no_such_user`       |
/// | InvalidCredentials | 400    | `invalid_credentials`|
/// | Unauthorized       | 401    | `unauthorized`       |
/// | NotApproved        | 403    | `not_approved`       |
/// | Forbidden          | 403    | `forbidden`          |
/// | NotFound           | 404    | `not_found`          |
/// | Internal           | 500    | `internal_error`     |
///
/// Internal errors are logged server-side; the client sees only a generic
/// message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input (400)
    Validation(Vec<ValidationErrorDetail>),

    /// Duplicate username (400 per the wire contract)
    Conflict(String),

    /// Login attempt for a username that does not exist (400)
    UnknownUser,

    /// Password hash mismatch (400)
    InvalidCredentials,

    /// Missing or invalid bearer token (401)
    Unauthorized(String),

    /// Account exists but has not been approved (403)
    NotApproved,

    /// Authorization failure (403)
    Forbidden(String),

    /// Unknown resource, e.g. a task id (404)
    NotFound(String),

    /// Store failure or other internal error (500)
    Internal(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable reason string (e.g. "forbidden")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::UnknownUser => write!(f, "No such user"),
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotApproved => write!(f, "Account not approved"),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, "conflict", msg, None),
            ApiError::UnknownUser => (
                StatusCode::BAD_REQUEST,
                "no_such_user",
                "No such user".to_string(),
                None,
            ),
            ApiError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                "invalid_credentials",
                "Invalid username or password".to_string(),
                None,
            ),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotApproved => (
                StatusCode::FORBIDDEN,
                "not_approved",
                "Account has not been approved".to_string(),
                None,
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Internal(msg) => {
                // Log the detail, return a generic message
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert store errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("username") {
                        return ApiError::Conflict("Username already taken".to_string());
                    }
                    return ApiError::Conflict(format!("Constraint violation: {}", constraint));
                }

                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert request validation failures to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(errors)
    }
}

/// Convert authorization errors to API errors
impl From<foreman_shared::auth::authorization::AuthzError> for ApiError {
    fn from(err: foreman_shared::auth::authorization::AuthzError) -> Self {
        use foreman_shared::auth::authorization::AuthzError;

        match err {
            AuthzError::NotDirector => ApiError::Forbidden("Director role required".to_string()),
            AuthzError::NotAuthorized => {
                ApiError::Forbidden("Not authorized to access this resource".to_string())
            }
            AuthzError::DatabaseError(err) => ApiError::from(err),
        }
    }
}

/// Convert password errors to API errors
impl From<foreman_shared::auth::password::PasswordError> for ApiError {
    fn from(err: foreman_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert token errors to API errors
impl From<foreman_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: foreman_shared::auth::jwt::JwtError) -> Self {
        use foreman_shared::auth::jwt::JwtError;

        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => ApiError::Unauthorized("Invalid token issuer".to_string()),
            JwtError::CreateError(msg) => ApiError::Internal(msg),
            JwtError::ValidationError(_) => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foreman_shared::auth::authorization::AuthzError;

    #[test]
    fn test_error_display() {
        let err = ApiError::Forbidden("Director role required".to_string());
        assert_eq!(err.to_string(), "Forbidden: Director role required");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (ApiError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (
                ApiError::Conflict("dup".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (ApiError::UnknownUser, StatusCode::BAD_REQUEST),
            (ApiError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (
                ApiError::Unauthorized("x".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::NotApproved, StatusCode::FORBIDDEN),
            (ApiError::Forbidden("x".to_string()), StatusCode::FORBIDDEN),
            (ApiError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (
                ApiError::Internal("x".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_authz_error_maps_to_forbidden() {
        let err = ApiError::from(AuthzError::NotDirector);
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);

        let err = ApiError::from(AuthzError::NotAuthorized);
        assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let response = ApiError::Internal("connection refused to db-host:5432".to_string())
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
