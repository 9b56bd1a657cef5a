use crate::state::AppState;
use axum::Router;

pub mod dto;
pub mod gateway;
pub mod handlers;
pub mod provider;
pub mod stub;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::assist_routes())
}
