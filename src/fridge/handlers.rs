use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{
    AddItemRequest, CategoryUsage, FridgeContents, FridgeItemView, FridgeStats, GroupScope,
    NotificationResponse, UpdateItemRequest,
};
use super::expiry::{self, NOTIFY_WINDOW_DAYS, STATS_SOON_WINDOW_DAYS};
use super::repo::{self, Fridge};
use super::services;
use crate::auth::jwt::AuthUser;
use crate::catalog::repo::{Category, Product};
use crate::error::ApiError;
use crate::groups::repo::resolve_group;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/fridge", get(list_fridge).post(add_item))
        .route("/fridge/notifications", get(notifications))
        .route(
            "/fridge/items/:id",
            get(get_item).patch(update_item).delete(delete_item),
        )
}

async fn scoped_fridge(
    state: &AppState,
    user_id: Uuid,
    group_id: Option<Uuid>,
) -> Result<Fridge, ApiError> {
    let group = resolve_group(&state.db, user_id, group_id).await?;
    Ok(Fridge::get_or_create(&state.db, group.id).await?)
}

async fn build_stats(state: &AppState, fridge_id: Uuid) -> Result<FridgeStats, ApiError> {
    let today = expiry::today();
    let soon_until = today + Duration::days(STATS_SOON_WINDOW_DAYS);
    let counts = repo::stats_counts(&state.db, fridge_id, today, soon_until).await?;
    let categories = repo::top_categories(&state.db, fridge_id, 5).await?;
    Ok(FridgeStats {
        total_products: counts.total,
        expired_products: counts.expired,
        expiring_soon_products: counts.expiring_soon,
        popular_categories: categories
            .into_iter()
            .map(|c| CategoryUsage {
                category_name: c.category_name,
                total_quantity: c.total_quantity,
            })
            .collect(),
    })
}

#[instrument(skip(state))]
pub async fn list_fridge(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(scope): Query<GroupScope>,
) -> Result<Json<FridgeContents>, ApiError> {
    let fridge = scoped_fridge(&state, user_id, scope.group_id).await?;
    let today = expiry::today();

    let items = repo::list_items(&state.db, fridge.id)
        .await?
        .into_iter()
        .map(|row| FridgeItemView::from_row(row, today))
        .collect();
    let stats = build_stats(&state, fridge.id).await?;

    Ok(Json(FridgeContents { items, stats }))
}

#[instrument(skip(state))]
pub async fn get_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(scope): Query<GroupScope>,
    Path(id): Path<Uuid>,
) -> Result<Json<FridgeItemView>, ApiError> {
    let fridge = scoped_fridge(&state, user_id, scope.group_id).await?;
    let row = repo::get_item(&state.db, fridge.id, id)
        .await?
        .ok_or(ApiError::NotFound("fridge item"))?;
    Ok(Json(FridgeItemView::from_row(row, expiry::today())))
}

/// Resolve the product a new item refers to: an explicit catalog id, an
/// existing product matched by name, or a freshly created custom product.
async fn resolve_product(
    state: &AppState,
    fridge_id: Uuid,
    payload: &AddItemRequest,
) -> Result<Product, ApiError> {
    let today = expiry::today();

    if let Some(product_id) = payload.product_id {
        let product = Product::find_by_id(&state.db, product_id)
            .await?
            .ok_or_else(|| ApiError::validation("selected product does not exist"))?;
        services::ensure_not_in_fridge(
            repo::contains_product(&state.db, fridge_id, product.id).await?,
        )?;
        return Ok(product);
    }

    let name = payload
        .product_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::validation("product_id or product_name is required"))?;

    if let Some(product) = Product::find_by_name(&state.db, name).await? {
        services::ensure_not_in_fridge(
            repo::contains_product(&state.db, fridge_id, product.id).await?,
        )?;
        return Ok(product);
    }

    // Unknown name: create a custom catalog entry for it.
    let unit = payload
        .unit
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::validation("unit is required when creating a new product"))?;

    let category_id = match payload.category_id {
        Some(id) => Some(
            Category::find_by_id(&state.db, id)
                .await?
                .ok_or_else(|| ApiError::validation("category does not exist"))?
                .id,
        ),
        None => None,
    };

    // Shelf life is inferred from the expiry date, at least one day.
    let shelf_life = expiry::days_remaining(today, payload.expires_on).max(1) as i32;
    let product = Product::create_custom(&state.db, name, unit, shelf_life, category_id).await?;
    info!(product_id = %product.id, name = %product.name, "custom product created");
    Ok(product)
}

#[instrument(skip(state, payload))]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(scope): Query<GroupScope>,
    Json(payload): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<FridgeItemView>), ApiError> {
    let fridge = scoped_fridge(&state, user_id, scope.group_id).await?;
    let today = expiry::today();

    let location = services::validate_new_item(
        today,
        payload.quantity,
        payload.expires_on,
        payload.location.as_deref(),
    )?;

    let product = resolve_product(&state, fridge.id, &payload).await?;
    let row = repo::insert_item(
        &state.db,
        fridge.id,
        product.id,
        payload.quantity,
        &location,
        payload.expires_on,
    )
    .await?;

    info!(item_id = %row.id, product = %row.product_name, "item added to fridge");
    Ok((
        StatusCode::CREATED,
        Json(FridgeItemView::from_row(row, today)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(scope): Query<GroupScope>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<Json<FridgeItemView>, ApiError> {
    let fridge = scoped_fridge(&state, user_id, scope.group_id).await?;
    let today = expiry::today();

    let location = services::validate_item_patch(
        today,
        payload.quantity,
        payload.expires_on,
        payload.location.as_deref(),
    )?;

    let row = repo::update_item(
        &state.db,
        fridge.id,
        id,
        payload.quantity,
        location.as_deref(),
        payload.expires_on,
    )
    .await?
    .ok_or(ApiError::NotFound("fridge item"))?;

    Ok(Json(FridgeItemView::from_row(row, today)))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(scope): Query<GroupScope>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let fridge = scoped_fridge(&state, user_id, scope.group_id).await?;
    if !repo::delete_item(&state.db, fridge.id, id).await? {
        return Err(ApiError::NotFound("fridge item"));
    }
    info!(item_id = %id, "item removed from fridge");
    Ok(StatusCode::NO_CONTENT)
}

/// Expired items first, then items expiring within the next three days,
/// both ordered by expiry date ascending.
#[instrument(skip(state))]
pub async fn notifications(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(scope): Query<GroupScope>,
) -> Result<Json<NotificationResponse>, ApiError> {
    let fridge = scoped_fridge(&state, user_id, scope.group_id).await?;
    let today = expiry::today();
    let until = today + Duration::days(NOTIFY_WINDOW_DAYS);

    let expired = repo::expired_items(&state.db, fridge.id, today).await?;
    let expiring = repo::expiring_items(&state.db, fridge.id, today, until).await?;

    Ok(Json(services::assemble_notifications(today, expired, expiring)))
}
