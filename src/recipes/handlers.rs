use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::repo::{self, RecipeWithIngredients};
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<RecipeWithIngredients>>, ApiError> {
    let recipes = repo::list_with_ingredients(&state.db).await?;
    Ok(Json(recipes))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeWithIngredients>, ApiError> {
    let recipe = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(ApiError::NotFound("recipe"))?;
    let ingredients = repo::ingredients_for_recipe(&state.db, id).await?;
    Ok(Json(RecipeWithIngredients { recipe, ingredients }))
}
