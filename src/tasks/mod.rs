use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod handlers;
pub mod lifecycle;
pub mod repo;

pub use lifecycle::TaskStatus;
pub use repo::Task;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::task_routes())
}
