use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{auth::AuthUser, error::ApiError, state::AppState, tasks::TaskStatus};

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats/top-users", get(top_users))
        .route("/stats/cycle-time", get(cycle_time))
}

#[derive(Debug, Deserialize)]
pub struct TopUsersQuery {
    #[serde(default = "default_days")]
    pub days: i32,
    #[serde(default = "default_top_limit")]
    pub limit: i64,
}

fn default_days() -> i32 {
    7
}

fn default_top_limit() -> i64 {
    5
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct TopUserRow {
    pub user_id: i64,
    pub username: String,
    pub total_minutes: i64,
    pub task_count: i64,
}

#[derive(Debug, Serialize)]
pub struct TopUsersResponse {
    pub period_days: i32,
    pub top_users: Vec<TopUserRow>,
}

/// Top users ranked by minutes logged on their assigned tasks within the
/// lookback window.
#[instrument(skip(state))]
pub async fn top_users(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Query(q): Query<TopUsersQuery>,
) -> Result<Json<TopUsersResponse>, ApiError> {
    let days = q.days.clamp(1, 90);
    let limit = q.limit.clamp(1, 20);

    let rows = sqlx::query_as::<_, TopUserRow>(
        r#"
        SELECT u.id AS user_id,
               u.username,
               COALESCE(SUM(t.total_minutes), 0)::bigint AS total_minutes,
               COUNT(t.id) AS task_count
        FROM users u
        LEFT JOIN tasks t
          ON t.assignee_id = u.id
         AND t.updated_at >= NOW() - make_interval(days => $1)
        GROUP BY u.id, u.username
        ORDER BY COALESCE(SUM(t.total_minutes), 0) DESC
        LIMIT $2
        "#,
    )
    .bind(days)
    .bind(limit)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(TopUsersResponse {
        period_days: days,
        top_users: rows,
    }))
}

#[derive(Debug, sqlx::FromRow)]
struct CycleTimeRow {
    status: TaskStatus,
    task_count: i64,
    avg_minutes: f64,
}

#[derive(Debug, Serialize)]
pub struct CycleTimeEntry {
    pub status: TaskStatus,
    pub task_count: i64,
    pub avg_minutes: f64,
}

#[derive(Debug, Serialize)]
pub struct CycleTimeResponse {
    pub cycle_time_by_status: Vec<CycleTimeEntry>,
}

/// Task counts and average logged minutes per status. A full cycle-time
/// report would need status change event logs; this aggregates what the
/// tasks table holds.
#[instrument(skip(state))]
pub async fn cycle_time(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
) -> Result<Json<CycleTimeResponse>, ApiError> {
    let rows = sqlx::query_as::<_, CycleTimeRow>(
        r#"
        SELECT status,
               COUNT(id) AS task_count,
               COALESCE(AVG(total_minutes), 0)::float8 AS avg_minutes
        FROM tasks
        GROUP BY status
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(CycleTimeResponse {
        cycle_time_by_status: rows
            .into_iter()
            .map(|r| CycleTimeEntry {
                status: r.status,
                task_count: r.task_count,
                avg_minutes: (r.avg_minutes * 10.0).round() / 10.0,
            })
            .collect(),
    }))
}
