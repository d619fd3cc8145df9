use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::CreateGroupRequest;
use super::repo::Group;
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", get(list_my_groups).post(create_group))
        .route("/groups/:id/join", post(join_group))
}

#[instrument(skip(state))]
pub async fn list_my_groups(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<Group>>, ApiError> {
    let groups = Group::list_for_user(&state.db, user_id).await?;
    Ok(Json(groups))
}

#[instrument(skip(state, payload))]
pub async fn create_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Group>), ApiError> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("group name must not be empty"));
    }

    let group = Group::create(&state.db, name, payload.description.as_deref(), user_id).await?;
    info!(group_id = %group.id, "group created");
    Ok((StatusCode::CREATED, Json(group)))
}

#[instrument(skip(state))]
pub async fn join_group(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    Group::add_member(&state.db, id, user_id).await?;
    info!(group_id = %id, user_id = %user_id, "user joined group");
    Ok(StatusCode::NO_CONTENT)
}
