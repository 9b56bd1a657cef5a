use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;

use crate::tasks::lifecycle::TaskStatus;

/// Task record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub total_minutes: i32,
    pub assignee_id: Option<i64>,
    pub created_by: i64,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

const TASK_COLUMNS: &str =
    "id, title, description, status, total_minutes, assignee_id, created_by, created_at, updated_at";

impl Task {
    pub async fn find_by_id(db: &PgPool, id: i64) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    /// Filtered, newest-first page of tasks plus the total matching count.
    pub async fn list(
        db: &PgPool,
        status: Option<TaskStatus>,
        assignee_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> anyhow::Result<(Vec<Task>, i64)> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE ($1::task_status IS NULL OR status = $1)
              AND ($2::bigint IS NULL OR assignee_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(status)
        .bind(assignee_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(db)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM tasks
            WHERE ($1::task_status IS NULL OR status = $1)
              AND ($2::bigint IS NULL OR assignee_id = $2)
            "#,
        )
        .bind(status)
        .bind(assignee_id)
        .fetch_one(db)
        .await?;

        Ok((tasks, total))
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        description: Option<&str>,
        assignee_id: Option<i64>,
        total_minutes: i32,
        created_by: i64,
    ) -> anyhow::Result<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks (title, description, status, total_minutes, assignee_id, created_by)
            VALUES ($1, $2, 'todo', $3, $4, $5)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(title)
        .bind(description)
        .bind(total_minutes)
        .bind(assignee_id)
        .bind(created_by)
        .fetch_one(db)
        .await?;
        Ok(task)
    }

    /// Persist the mutable fields of an already-validated task value.
    /// Returns None when the row vanished since it was loaded.
    pub async fn save(&self, db: &PgPool) -> anyhow::Result<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                status = $4,
                total_minutes = $5,
                assignee_id = $6,
                updated_at = $7
            WHERE id = $1
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(self.id)
        .bind(&self.title)
        .bind(&self.description)
        .bind(self.status)
        .bind(self.total_minutes)
        .bind(self.assignee_id)
        .bind(self.updated_at)
        .fetch_optional(db)
        .await?;
        Ok(task)
    }

    /// Delete a task. Returns whether a row was removed.
    pub async fn delete(db: &PgPool, id: i64) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Tasks assigned to or created by the given user, for daily planning.
    pub async fn list_for_user(db: &PgPool, user_id: i64) -> anyhow::Result<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE assignee_id = $1 OR created_by = $1
            ORDER BY created_at ASC
            "#
        ))
        .bind(user_id)
        .fetch_all(db)
        .await?;
        Ok(tasks)
    }
}
