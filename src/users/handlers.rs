use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        guard::{require_admin, require_admin_flag_change, require_self_or_admin},
        handlers::is_valid_email,
        repo::User,
        AuthUser, PublicUser,
    },
    error::ApiError,
    state::AppState,
    users::dto::{DirectoryEntry, UserUpdate},
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/directory", get(user_directory))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn user_directory(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
) -> Result<Json<Vec<DirectoryEntry>>, ApiError> {
    let entries = User::directory(&state.db).await?;
    Ok(Json(entries))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    require_admin(&identity)?;
    let users = User::list_all(&state.db).await?;
    Ok(Json(users.into_iter().map(PublicUser::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_identity): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    Ok(Json(PublicUser::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
    Json(mut payload): Json<UserUpdate>,
) -> Result<Json<PublicUser>, ApiError> {
    require_self_or_admin(&identity, id)?;
    require_admin_flag_change(&identity, payload.is_admin)?;

    if let Some(username) = &payload.username {
        let len = username.chars().count();
        if !(3..=50).contains(&len) {
            return Err(ApiError::InvalidArgument(
                "Username must be 3-50 characters".into(),
            ));
        }
    }
    if let Some(email) = &mut payload.email {
        *email = email.trim().to_lowercase();
        if !is_valid_email(email) || email.chars().count() > 100 {
            return Err(ApiError::InvalidArgument("Invalid email".into()));
        }
    }

    // Unique violations on username/email surface as 409; a missing row is
    // 404 straight from the write, so there is no check-then-write race
    let user = User::update(&state.db, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("User"))?;
    info!(user_id = id, updated_by = identity.user_id, "user updated");
    Ok(Json(PublicUser::from(user)))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require_admin(&identity)?;
    if id == identity.user_id {
        warn!(user_id = id, "self-delete rejected");
        return Err(ApiError::InvalidArgument("Cannot delete yourself".into()));
    }

    if !User::delete(&state.db, id).await? {
        return Err(ApiError::NotFound("User"));
    }
    info!(user_id = id, deleted_by = identity.user_id, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}
