use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use crate::{
    assist::dto::{SuggestRequest, SuggestResponse, TaskBrief},
    auth::AuthUser,
    error::ApiError,
    state::AppState,
    tasks::repo::Task,
};

pub fn assist_routes() -> Router<AppState> {
    Router::new().route("/ai/suggest", post(suggest))
}

fn validate_suggest_title(title: &str) -> Result<(), ApiError> {
    let len = title.chars().count();
    if len == 0 {
        return Err(ApiError::InvalidArgument(
            "Title is required for description suggestions".into(),
        ));
    }
    if len > 200 {
        return Err(ApiError::InvalidArgument(
            "Title must be 1-200 characters".into(),
        ));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn suggest(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<SuggestRequest>,
) -> Result<Json<SuggestResponse>, ApiError> {
    match payload {
        SuggestRequest::Description { title } => {
            validate_suggest_title(&title)?;
            let suggestion = state.assist.describe_task(&title).await;
            Ok(Json(SuggestResponse {
                kind: "description",
                suggestion: suggestion.text,
                is_fallback: suggestion.is_fallback,
                warning: suggestion.warning,
            }))
        }
        SuggestRequest::DailyPlan => {
            let tasks = Task::list_for_user(&state.db, identity.user_id).await?;
            let briefs: Vec<TaskBrief> = tasks
                .into_iter()
                .map(|t| TaskBrief {
                    title: t.title,
                    status: t.status,
                })
                .collect();
            let suggestion = state.assist.plan_day(&briefs).await;
            Ok(Json(SuggestResponse {
                kind: "daily_plan",
                suggestion: suggestion.text,
                is_fallback: suggestion.is_fallback,
                warning: suggestion.warning,
            }))
        }
    }
}
