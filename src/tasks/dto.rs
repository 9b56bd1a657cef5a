use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::tasks::lifecycle::TaskStatus;
use crate::tasks::repo::Task;

/// Create task request body.
#[derive(Debug, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<i64>,
    #[serde(default)]
    pub total_minutes: i32,
}

/// Partial update; absent fields stay untouched.
#[derive(Debug, Default, Deserialize)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<i64>,
    pub total_minutes: Option<i32>,
}

/// Status transition request body.
#[derive(Debug, Deserialize)]
pub struct TaskStatusUpdate {
    pub status: TaskStatus,
}

/// Add minutes to a task.
#[derive(Debug, Deserialize)]
pub struct TaskLogTime {
    pub minutes: i32,
}

/// Query parameters for task listing.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub assignee_id: Option<i64>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Task data returned to clients.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub total_minutes: i32,
    pub assignee_id: Option<i64>,
    pub created_by: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Task> for TaskResponse {
    fn from(t: Task) -> Self {
        Self {
            id: t.id,
            title: t.title,
            description: t.description,
            status: t.status,
            total_minutes: t.total_minutes,
            assignee_id: t.assignee_id,
            created_by: t.created_by,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Paginated task list response.
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskResponse>,
    pub total: i64,
}
