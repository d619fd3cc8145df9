use std::collections::HashSet;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use super::engine;
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::fridge::repo::{self as fridge_repo, Fridge};
use crate::groups::repo::resolve_group;
use crate::recipes::repo as recipes_repo;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: i64 = 4;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub group_id: Option<Uuid>,
    // Raw string: a non-numeric page silently falls back to page 1.
    pub page: Option<String>,
    pub page_size: Option<i64>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/recommendations", get(list_recommendations))
}

#[instrument(skip(state))]
pub async fn list_recommendations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<RecommendationQuery>,
) -> Result<Json<engine::RecommendationPage>, ApiError> {
    let page_size = q.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page_size < 1 {
        return Err(ApiError::validation("page_size must be at least 1"));
    }

    let group = resolve_group(&state.db, user_id, q.group_id).await?;
    let fridge = Fridge::get_or_create(&state.db, group.id).await?;

    let inventory: HashSet<Uuid> = fridge_repo::inventory_product_ids(&state.db, fridge.id)
        .await?
        .into_iter()
        .collect();
    let recipes = recipes_repo::list_with_ingredients(&state.db).await?;

    let ranked = engine::recommend(recipes, &inventory);
    let page = engine::paginate(
        ranked,
        engine::resolve_page(q.page.as_deref()),
        page_size as usize,
    );

    Ok(Json(page))
}
