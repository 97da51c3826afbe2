/// Common test utilities for integration tests
///
/// Provides shared infrastructure:
/// - Database connection and migrations
/// - Test user / director creation
/// - Token generation
/// - Request builders and response helpers
///
/// Database-backed tests call [`TestContext::try_new`] and skip themselves
/// when `DATABASE_URL` is unset, so the suite stays green on machines
/// without PostgreSQL.

use axum::body::Body;
use axum::http::Request;
use foreman_api::app::{build_router, AppState};
use foreman_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use foreman_shared::auth::authorization::DIRECTOR_ROLE;
use foreman_shared::auth::jwt::{create_token, Claims};
use foreman_shared::auth::password::hash_password;
use foreman_shared::db::migrations::run_migrations;
use foreman_shared::models::role::{Role, UserRole};
use foreman_shared::models::user::{CreateUser, User, UserStatus};
use sqlx::PgPool;
use uuid::Uuid;

/// Signing secret used by all integration tests
pub const TEST_JWT_SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context holding the database pool and an in-process router
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Connects to the test database and builds the application
    ///
    /// Returns None when `DATABASE_URL` is unset.
    pub async fn try_new() -> anyhow::Result<Option<Self>> {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set, skipping database-backed test");
            return Ok(None);
        };

        let db = PgPool::connect(&url).await?;
        run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
        };

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext { db, app }))
    }

    /// Creates a user directly in the store
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        status: UserStatus,
    ) -> anyhow::Result<User> {
        let user = User::create(
            &self.db,
            CreateUser {
                username: username.to_string(),
                display_name: None,
                password_hash: hash_password(password)?,
                status,
                force_password_change: false,
                employee_id: None,
            },
        )
        .await?;

        Ok(user)
    }

    /// Creates an active user holding the director role
    pub async fn create_director(&self, username: &str) -> anyhow::Result<User> {
        let user = self
            .create_user(username, "director-password", UserStatus::Active)
            .await?;

        let role = Role::ensure(&self.db, DIRECTOR_ROLE).await?;
        UserRole::assign(&self.db, user.id, role.id, user.id).await?;

        Ok(user)
    }

    /// Mints a bearer token for a user
    pub fn token_for(&self, user: &User) -> String {
        let claims = Claims::new(user.id, user.username.clone());
        create_token(&claims, TEST_JWT_SECRET).expect("token creation should succeed")
    }
}

/// Generates a unique name so tests don't collide on the unique constraint
pub fn unique(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Builds a JSON POST request, optionally with a bearer token
pub fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    builder.body(Body::from(body.to_string())).unwrap()
}

/// Builds a GET request with a bearer token
pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

/// Reads a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
