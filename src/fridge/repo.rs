use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::{is_unique_violation, ApiError};

#[derive(Debug, Clone, FromRow)]
pub struct Fridge {
    pub id: Uuid,
    pub group_id: Uuid,
}

impl Fridge {
    /// Each group owns exactly one fridge, created lazily on first access.
    pub async fn get_or_create(db: &PgPool, group_id: Uuid) -> anyhow::Result<Fridge> {
        let fridge = sqlx::query_as::<_, Fridge>(
            r#"
            INSERT INTO fridges (group_id)
            VALUES ($1)
            ON CONFLICT (group_id) DO UPDATE SET group_id = EXCLUDED.group_id
            RETURNING id, group_id
            "#,
        )
        .bind(group_id)
        .fetch_one(db)
        .await?;
        Ok(fridge)
    }
}

/// Fridge item joined with its product and category names.
#[derive(Debug, Clone, FromRow)]
pub struct FridgeItemRow {
    pub id: Uuid,
    pub fridge_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit: String,
    pub category_name: Option<String>,
    pub quantity: i32,
    pub location: String,
    pub expires_on: Date,
    pub added_at: OffsetDateTime,
}

const ITEM_SELECT: &str = r#"
    SELECT i.id, i.fridge_id, i.product_id, p.name AS product_name, p.unit,
           c.name AS category_name, i.quantity, i.location, i.expires_on, i.added_at
    FROM fridge_items i
    JOIN products p ON p.id = i.product_id
    LEFT JOIN categories c ON c.id = p.category_id
"#;

pub async fn list_items(db: &PgPool, fridge_id: Uuid) -> anyhow::Result<Vec<FridgeItemRow>> {
    let rows = sqlx::query_as::<_, FridgeItemRow>(&format!(
        "{ITEM_SELECT} WHERE i.fridge_id = $1 ORDER BY i.added_at ASC"
    ))
    .bind(fridge_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get_item(
    db: &PgPool,
    fridge_id: Uuid,
    item_id: Uuid,
) -> anyhow::Result<Option<FridgeItemRow>> {
    let row = sqlx::query_as::<_, FridgeItemRow>(&format!(
        "{ITEM_SELECT} WHERE i.fridge_id = $1 AND i.id = $2"
    ))
    .bind(fridge_id)
    .bind(item_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn contains_product(
    db: &PgPool,
    fridge_id: Uuid,
    product_id: Uuid,
) -> anyhow::Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM fridge_items WHERE fridge_id = $1 AND product_id = $2)",
    )
    .bind(fridge_id)
    .bind(product_id)
    .fetch_one(db)
    .await?;
    Ok(exists)
}

/// Insert a new item. The unique constraint on (fridge_id, product_id)
/// backstops the pre-insert duplicate check against concurrent adds.
pub async fn insert_item(
    db: &PgPool,
    fridge_id: Uuid,
    product_id: Uuid,
    quantity: i32,
    location: &str,
    expires_on: Date,
) -> Result<FridgeItemRow, ApiError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO fridge_items (fridge_id, product_id, quantity, location, expires_on)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(fridge_id)
    .bind(product_id)
    .bind(quantity)
    .bind(location)
    .bind(expires_on)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::conflict("product already in fridge")
        } else {
            ApiError::Database(e)
        }
    })?;

    get_item(db, fridge_id, id)
        .await?
        .ok_or(ApiError::NotFound("fridge item"))
}

pub async fn update_item(
    db: &PgPool,
    fridge_id: Uuid,
    item_id: Uuid,
    quantity: Option<i32>,
    location: Option<&str>,
    expires_on: Option<Date>,
) -> anyhow::Result<Option<FridgeItemRow>> {
    let updated = sqlx::query_scalar::<_, Uuid>(
        r#"
        UPDATE fridge_items
        SET quantity = COALESCE($3, quantity),
            location = COALESCE($4, location),
            expires_on = COALESCE($5, expires_on)
        WHERE fridge_id = $1 AND id = $2
        RETURNING id
        "#,
    )
    .bind(fridge_id)
    .bind(item_id)
    .bind(quantity)
    .bind(location)
    .bind(expires_on)
    .fetch_optional(db)
    .await?;

    match updated {
        Some(id) => get_item(db, fridge_id, id).await,
        None => Ok(None),
    }
}

pub async fn delete_item(db: &PgPool, fridge_id: Uuid, item_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query("DELETE FROM fridge_items WHERE fridge_id = $1 AND id = $2")
        .bind(fridge_id)
        .bind(item_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Items already past their expiry date, oldest first.
pub async fn expired_items(
    db: &PgPool,
    fridge_id: Uuid,
    today: Date,
) -> anyhow::Result<Vec<FridgeItemRow>> {
    let rows = sqlx::query_as::<_, FridgeItemRow>(&format!(
        "{ITEM_SELECT} WHERE i.fridge_id = $1 AND i.expires_on < $2 ORDER BY i.expires_on ASC"
    ))
    .bind(fridge_id)
    .bind(today)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Items expiring between `today` and `until` inclusive, soonest first.
pub async fn expiring_items(
    db: &PgPool,
    fridge_id: Uuid,
    today: Date,
    until: Date,
) -> anyhow::Result<Vec<FridgeItemRow>> {
    let rows = sqlx::query_as::<_, FridgeItemRow>(&format!(
        r#"{ITEM_SELECT}
        WHERE i.fridge_id = $1 AND i.expires_on >= $2 AND i.expires_on <= $3
        ORDER BY i.expires_on ASC"#
    ))
    .bind(fridge_id)
    .bind(today)
    .bind(until)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Product ids currently present in a fridge, the inventory side of the
/// recommendation computation.
pub async fn inventory_product_ids(db: &PgPool, fridge_id: Uuid) -> anyhow::Result<Vec<Uuid>> {
    let ids =
        sqlx::query_scalar::<_, Uuid>("SELECT product_id FROM fridge_items WHERE fridge_id = $1")
            .bind(fridge_id)
            .fetch_all(db)
            .await?;
    Ok(ids)
}

#[derive(Debug, FromRow)]
pub struct StatsCounts {
    pub total: i64,
    pub expired: i64,
    pub expiring_soon: i64,
}

pub async fn stats_counts(
    db: &PgPool,
    fridge_id: Uuid,
    today: Date,
    soon_until: Date,
) -> anyhow::Result<StatsCounts> {
    let counts = sqlx::query_as::<_, StatsCounts>(
        r#"
        SELECT COUNT(*) AS total,
               COUNT(*) FILTER (WHERE expires_on < $2) AS expired,
               COUNT(*) FILTER (WHERE expires_on >= $2 AND expires_on <= $3) AS expiring_soon
        FROM fridge_items
        WHERE fridge_id = $1
        "#,
    )
    .bind(fridge_id)
    .bind(today)
    .bind(soon_until)
    .fetch_one(db)
    .await?;
    Ok(counts)
}

#[derive(Debug, FromRow)]
pub struct CategoryQuantityRow {
    pub category_name: String,
    pub total_quantity: i64,
}

/// Top categories by summed quantity; items whose product has no category
/// are grouped under "uncategorized".
pub async fn top_categories(
    db: &PgPool,
    fridge_id: Uuid,
    limit: i64,
) -> anyhow::Result<Vec<CategoryQuantityRow>> {
    let rows = sqlx::query_as::<_, CategoryQuantityRow>(
        r#"
        SELECT COALESCE(c.name, 'uncategorized') AS category_name,
               SUM(i.quantity)::BIGINT AS total_quantity
        FROM fridge_items i
        JOIN products p ON p.id = i.product_id
        LEFT JOIN categories c ON c.id = p.category_id
        WHERE i.fridge_id = $1
        GROUP BY COALESCE(c.name, 'uncategorized')
        ORDER BY total_quantity DESC
        LIMIT $2
        "#,
    )
    .bind(fridge_id)
    .bind(limit)
    .fetch_all(db)
    .await?;
    Ok(rows)
}
