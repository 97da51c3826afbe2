/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with all
/// routes and middleware. The pool and configuration are constructed in
/// main and passed in; nothing in the request path reads ambient globals.
///
/// # Example
///
/// ```no_run
/// use foreman_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = foreman_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use foreman_shared::auth::jwt;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uuid::Uuid;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor. Uses Arc
/// internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<crate::config::Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: crate::config::Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Authenticated identity extracted from a bearer token
///
/// Inserted into request extensions by [`bearer_auth_layer`]; handlers
/// extract it with `Extension<AuthUser>`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// User ID from the token's `sub` claim
    pub id: Uuid,

    /// Username at time of issuance
    pub username: String,
}

/// Builds the complete axum router
///
/// # Routes
///
/// ```text
/// /api
/// ├── GET  /health                  # public
/// ├── POST /auth/register           # public
/// ├── POST /auth/login              # public
/// ├── POST /admin/users             # bearer, director only
/// ├── POST /admin/users/:id/approve # bearer, director only
/// ├── POST /tasks                   # bearer
/// ├── POST /tasks/:id/approve       # bearer, director only
/// └── GET  /users/:id/tasks         # bearer, self or director
/// ```
///
/// # Middleware Stack
///
/// Request tracing and CORS wrap everything; bearer authentication is
/// applied only to the protected routes.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes, no auth
    let public_routes = Router::new()
        .route("/api/health", get(routes::health::health_check))
        .route("/api/auth/register", post(routes::auth::register))
        .route("/api/auth/login", post(routes::auth::login));

    // Everything else requires a valid bearer token
    let protected_routes = Router::new()
        .route("/api/admin/users", post(routes::admin::create_user))
        .route(
            "/api/admin/users/:id/approve",
            post(routes::admin::approve_user),
        )
        .route("/api/tasks", post(routes::tasks::create_task))
        .route("/api/tasks/:id/approve", post(routes::tasks::approve_task))
        .route("/api/users/:id/tasks", get(routes::tasks::list_user_tasks))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Bearer authentication middleware
///
/// Extracts and validates the token from the Authorization header, then
/// injects [`AuthUser`] into request extensions. Verification failures map
/// to 401 through the `JwtError` conversion.
async fn bearer_auth_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(req).await)
}
