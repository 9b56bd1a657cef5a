use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{info, instrument, warn};

use crate::{
    auth::{repo::User, AuthUser},
    error::ApiError,
    state::AppState,
    tasks::{
        dto::{
            TaskCreate, TaskListQuery, TaskListResponse, TaskLogTime, TaskResponse,
            TaskStatusUpdate, TaskUpdate,
        },
        repo::Task,
    },
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/status", patch(update_task_status))
        .route("/tasks/:id/log-time", post(log_time))
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    let len = title.chars().count();
    if len == 0 || len > 200 {
        return Err(ApiError::InvalidArgument(
            "Title must be 1-200 characters".into(),
        ));
    }
    Ok(())
}

async fn ensure_assignee_exists(state: &AppState, assignee_id: i64) -> Result<(), ApiError> {
    if User::find_by_id(&state.db, assignee_id).await?.is_none() {
        return Err(ApiError::NotFound("Assignee"));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Query(q): Query<TaskListQuery>,
) -> Result<Json<TaskListResponse>, ApiError> {
    let skip = q.skip.max(0);
    let limit = q.limit.clamp(1, 100);
    let (tasks, total) = Task::list(&state.db, q.status, q.assignee_id, skip, limit).await?;
    Ok(Json(TaskListResponse {
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
        total,
    }))
}

#[instrument(skip(state))]
pub async fn get_task(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;
    Ok(Json(TaskResponse::from(task)))
}

#[instrument(skip(state, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<TaskCreate>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    validate_title(&payload.title)?;
    if payload.total_minutes < 0 {
        return Err(ApiError::InvalidArgument(
            "total_minutes must be non-negative".into(),
        ));
    }
    if let Some(assignee_id) = payload.assignee_id {
        ensure_assignee_exists(&state, assignee_id).await?;
    }

    let task = Task::create(
        &state.db,
        &payload.title,
        payload.description.as_deref(),
        payload.assignee_id,
        payload.total_minutes,
        identity.user_id,
    )
    .await?;

    info!(task_id = task.id, created_by = identity.user_id, "task created");
    Ok((StatusCode::CREATED, Json(TaskResponse::from(task))))
}

#[instrument(skip(state, payload))]
pub async fn update_task(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<TaskUpdate>,
) -> Result<Json<TaskResponse>, ApiError> {
    if let Some(title) = &payload.title {
        validate_title(title)?;
    }
    if matches!(payload.total_minutes, Some(m) if m < 0) {
        return Err(ApiError::InvalidArgument(
            "total_minutes must be non-negative".into(),
        ));
    }
    if let Some(assignee_id) = payload.assignee_id {
        ensure_assignee_exists(&state, assignee_id).await?;
    }

    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;

    let updated = task.apply_update(&payload, OffsetDateTime::now_utc());
    let saved = updated
        .save(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;
    Ok(Json(TaskResponse::from(saved)))
}

#[instrument(skip(state))]
pub async fn update_task_status(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<TaskStatusUpdate>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;

    let transitioned = match task.transition(payload.status, OffsetDateTime::now_utc()) {
        Ok(t) => t,
        Err(e) => {
            warn!(task_id = id, requested = %payload.status, "rejected status change");
            return Err(e);
        }
    };
    let saved = transitioned
        .save(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;
    info!(task_id = id, status = %saved.status, "task status changed");
    Ok(Json(TaskResponse::from(saved)))
}

#[instrument(skip(state))]
pub async fn log_time(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<TaskLogTime>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;

    let logged = task.log_time(payload.minutes, OffsetDateTime::now_utc())?;
    let saved = logged
        .save(&state.db)
        .await?
        .ok_or(ApiError::NotFound("Task"))?;
    info!(
        task_id = id,
        minutes = payload.minutes,
        total = saved.total_minutes,
        "time logged"
    );
    Ok(Json(TaskResponse::from(saved)))
}

#[instrument(skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !Task::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("Task"));
    }
    info!(task_id = id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}
