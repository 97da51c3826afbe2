/// Task endpoints
///
/// # Endpoints
///
/// - `POST /api/tasks` - Create a task
/// - `POST /api/tasks/:id/approve` - Approve a pending task (director only)
/// - `GET /api/users/:id/tasks` - List a user's assigned tasks
///
/// A task created by a director is active immediately; anyone else's waits
/// for director approval. Task lists are visible to the assignee themselves
/// and to directors.

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use foreman_shared::{
    auth::authorization::{require_director, require_self_or_director, DirectorLookup},
    models::task::{CreateTask, Task, TaskStatus},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,

    /// Task description
    #[serde(default)]
    pub description: String,

    /// User the task is assigned to
    pub assignee_id: Uuid,

    /// Optional group reference
    pub group_id: Option<Uuid>,
}

/// Create task response
#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    /// New task ID
    pub id: Uuid,

    /// Initial approval state
    pub status: TaskStatus,
}

/// Approve task response
#[derive(Debug, Serialize)]
pub struct ApproveTaskResponse {
    /// Always true on success
    pub ok: bool,
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Clean room",
///   "description": "Before Friday",
///   "assignee_id": "uuid",
///   "group_id": null
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing title
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    req.validate()?;

    let creator_is_director = state.db.is_director(auth.id).await?;

    let task = Task::create(
        &state.db,
        CreateTask {
            title: req.title,
            description: req.description,
            created_by: auth.id,
            assignee_id: req.assignee_id,
            group_id: req.group_id,
            status: TaskStatus::initial(creator_is_director),
        },
    )
    .await?;

    tracing::info!(
        task_id = %task.id,
        created_by = %auth.username,
        status = task.status.as_str(),
        "task created"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            id: task.id,
            status: task.status,
        }),
    ))
}

/// Approve a pending task
///
/// Sets the task active and records the approving director. Re-approving
/// an active task succeeds and leaves it active.
///
/// # Endpoint
///
/// ```text
/// POST /api/tasks/:id/approve
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: acting user is not a director
/// - `404 Not Found`: no task with that ID
pub async fn approve_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
) -> ApiResult<Json<ApproveTaskResponse>> {
    require_director(&state.db, auth.id).await?;

    let task = Task::approve(&state.db, task_id, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(task_id = %task.id, approved_by = %auth.username, "task approved");

    Ok(Json(ApproveTaskResponse { ok: true }))
}

/// List a user's assigned tasks, newest first
///
/// Visible to the assignee themselves and to directors.
///
/// # Endpoint
///
/// ```text
/// GET /api/users/:id/tasks
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `403 Forbidden`: acting user is neither the target nor a director
pub async fn list_user_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(user_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Task>>> {
    require_self_or_director(&state.db, auth.id, user_id).await?;

    let tasks = Task::list_by_assignee(&state.db, user_id).await?;

    Ok(Json(tasks))
}
