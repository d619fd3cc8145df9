mod dto;
pub mod handlers;
pub mod jwt;
mod password;
mod repo;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::routes())
}
