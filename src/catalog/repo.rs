use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub unit: String,
    pub shelf_life_days: i32,
    pub is_custom: bool,
    pub category_id: Option<Uuid>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
}

const PRODUCT_COLUMNS: &str = "id, name, unit, shelf_life_days, is_custom, category_id, created_at";

impl Product {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    /// Case-insensitive name lookup, used when an item is added by name
    /// instead of by catalog id.
    pub async fn find_by_name(db: &PgPool, name: &str) -> anyhow::Result<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE lower(name) = lower($1) LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(db)
        .await?;
        Ok(product)
    }

    pub async fn search(db: &PgPool, term: Option<&str>) -> anyhow::Result<Vec<Product>> {
        let products = match term {
            Some(t) if !t.trim().is_empty() => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products WHERE name ILIKE $1 ORDER BY name ASC"
                ))
                .bind(format!("%{}%", t.trim()))
                .fetch_all(db)
                .await?
            }
            _ => {
                sqlx::query_as::<_, Product>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name ASC"
                ))
                .fetch_all(db)
                .await?
            }
        };
        Ok(products)
    }

    pub async fn create_custom(
        db: &PgPool,
        name: &str,
        unit: &str,
        shelf_life_days: i32,
        category_id: Option<Uuid>,
    ) -> anyhow::Result<Product> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, unit, shelf_life_days, is_custom, category_id)
            VALUES ($1, $2, $3, TRUE, $4)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(unit)
        .bind(shelf_life_days)
        .bind(category_id)
        .fetch_one(db)
        .await?;
        Ok(product)
    }
}

impl Category {
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Category>> {
        let category =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(category)
    }

    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY name ASC")
                .fetch_all(db)
                .await?;
        Ok(categories)
    }
}
