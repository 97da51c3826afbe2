/// Task model and database operations
///
/// Tasks are assigned to a user and pass through a director approval gate.
/// A task created by a director is active immediately; anyone else's task
/// waits in `pending_approval` until a director approves it, which records
/// the approving identity.
///
/// # State Machine
///
/// ```text
/// pending_approval → active   (director approval)
/// ```
///
/// Created directly as `active` when the creator is a director. No
/// transition leaves `active`.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending_approval', 'active');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     created_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     assignee_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     group_id UUID,
///     status task_status NOT NULL DEFAULT 'pending_approval',
///     approved_by UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Approval state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Waiting for a director to approve
    PendingApproval,

    /// Approved, or created by a director
    Active,
}

impl TaskStatus {
    /// Converts status to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::PendingApproval => "pending_approval",
            TaskStatus::Active => "active",
        }
    }

    /// Initial status for a new task
    ///
    /// Directors' tasks skip the approval queue.
    pub fn initial(creator_is_director: bool) -> Self {
        if creator_is_director {
            TaskStatus::Active
        } else {
            TaskStatus::PendingApproval
        }
    }
}

/// Task model representing an assigned piece of work
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// User who created the task (nullable if user deleted)
    pub created_by: Option<Uuid>,

    /// User the task is assigned to
    pub assignee_id: Uuid,

    /// Optional group reference
    pub group_id: Option<Uuid>,

    /// Approval state
    pub status: TaskStatus,

    /// Director who approved the task; set only via approval
    pub approved_by: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Task title
    pub title: String,

    /// Task description
    pub description: String,

    /// Creating user
    pub created_by: Uuid,

    /// Assigned user
    pub assignee_id: Uuid,

    /// Optional group reference
    pub group_id: Option<Uuid>,

    /// Initial status, computed from the creator's role
    /// via [`TaskStatus::initial`]
    pub status: TaskStatus,
}

impl Task {
    /// Creates a new task
    ///
    /// # Errors
    ///
    /// Returns an error if the assignee does not exist (foreign key
    /// violation) or the database connection fails
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, created_by, assignee_id, group_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, created_by, assignee_id, group_id,
                      status, approved_by, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.created_by)
        .bind(data.assignee_id)
        .bind(data.group_id)
        .bind(data.status)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    ///
    /// Returns the task if found, None otherwise.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, created_by, assignee_id, group_id,
                   status, approved_by, created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Approves a task, recording the approver
    ///
    /// Sets status to `active`. Approving an already-active task rewrites
    /// the approver and reports success; concurrent approvals converge on
    /// the last writer.
    ///
    /// # Returns
    ///
    /// The updated task, or None if no task with that ID exists
    pub async fn approve(
        pool: &PgPool,
        id: Uuid,
        approver_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = 'active', approved_by = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, created_by, assignee_id, group_id,
                      status, approved_by, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(approver_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists the tasks assigned to a user, newest first
    pub async fn list_by_assignee(
        pool: &PgPool,
        assignee_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, created_by, assignee_id, group_id,
                   status, approved_by, created_at, updated_at
            FROM tasks
            WHERE assignee_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(assignee_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_strings() {
        assert_eq!(TaskStatus::PendingApproval.as_str(), "pending_approval");
        assert_eq!(TaskStatus::Active.as_str(), "active");
    }

    #[test]
    fn test_initial_status_follows_creator_role() {
        assert_eq!(TaskStatus::initial(true), TaskStatus::Active);
        assert_eq!(TaskStatus::initial(false), TaskStatus::PendingApproval);
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&TaskStatus::PendingApproval).unwrap();
        assert_eq!(json, "\"pending_approval\"");

        let json = serde_json::to_string(&TaskStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");
    }

    // Integration tests for database operations are in foreman-api/tests/
}
