use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::expiry::Urgency;
use super::repo::FridgeItemRow;

#[derive(Debug, Deserialize)]
pub struct GroupScope {
    pub group_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_id: Option<Uuid>,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub expires_on: Date,
    #[serde(default)]
    pub location: Option<String>,
    // Required only when the by-name path has to create a custom product.
    pub unit: Option<String>,
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub quantity: Option<i32>,
    pub expires_on: Option<Date>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FridgeItemView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit: String,
    pub category_name: Option<String>,
    pub quantity: i32,
    pub location: String,
    pub expires_on: Date,
    pub added_at: OffsetDateTime,
    pub is_expiring_soon: bool,
}

impl FridgeItemView {
    pub fn from_row(row: FridgeItemRow, today: Date) -> Self {
        let is_expiring_soon = super::expiry::is_expiring_soon(today, row.expires_on);
        Self {
            id: row.id,
            product_id: row.product_id,
            product_name: row.product_name,
            unit: row.unit,
            category_name: row.category_name,
            quantity: row.quantity,
            location: row.location,
            expires_on: row.expires_on,
            added_at: row.added_at,
            is_expiring_soon,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NotificationItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub unit: String,
    pub category_name: Option<String>,
    pub quantity: i32,
    pub location: String,
    pub expires_on: Date,
    pub days_remaining: i64,
    pub urgency: Urgency,
    pub urgency_text: String,
}

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub total_expiring: usize,
    pub items: Vec<NotificationItem>,
}

// Keys kept camelCase to match the shape clients already consume.
#[derive(Debug, Serialize)]
pub struct CategoryUsage {
    #[serde(rename = "categoryName")]
    pub category_name: String,
    #[serde(rename = "totalQuantity")]
    pub total_quantity: i64,
}

#[derive(Debug, Serialize)]
pub struct FridgeStats {
    pub total_products: i64,
    pub expired_products: i64,
    pub expiring_soon_products: i64,
    pub popular_categories: Vec<CategoryUsage>,
}

#[derive(Debug, Serialize)]
pub struct FridgeContents {
    pub items: Vec<FridgeItemView>,
    pub stats: FridgeStats,
}
