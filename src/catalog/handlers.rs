use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use super::repo::{Category, Product};
use crate::auth::jwt::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products))
        .route("/categories", get(list_categories))
}

#[derive(Debug, Deserialize)]
pub struct ProductSearch {
    pub search: Option<String>,
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(q): Query<ProductSearch>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = Product::search(&state.db, q.search.as_deref()).await?;
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = Category::list(&state.db).await?;
    Ok(Json(categories))
}
