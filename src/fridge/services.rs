//! Pre-mutation validation and notification assembly, kept free of database
//! access so the rejection and ordering contracts are unit-testable.

use time::Date;

use super::dto::{NotificationItem, NotificationResponse};
use super::expiry::{self, Urgency};
use super::repo::FridgeItemRow;
use crate::error::ApiError;

/// Checks for a new fridge item, run before any write. Returns the
/// validated storage location.
pub fn validate_new_item(
    today: Date,
    quantity: i32,
    expires_on: Date,
    location: Option<&str>,
) -> Result<String, ApiError> {
    check_quantity(quantity)?;
    check_expiry(today, expires_on)?;
    validate_location(location)
}

/// Checks for a partial item update; only supplied fields are validated.
/// Returns the validated location when one was supplied.
pub fn validate_item_patch(
    today: Date,
    quantity: Option<i32>,
    expires_on: Option<Date>,
    location: Option<&str>,
) -> Result<Option<String>, ApiError> {
    if let Some(quantity) = quantity {
        check_quantity(quantity)?;
    }
    if let Some(expires_on) = expires_on {
        check_expiry(today, expires_on)?;
    }
    location.map(|l| validate_location(Some(l))).transpose()
}

/// A product may appear at most once per fridge; a second add is rejected,
/// never merged.
pub fn ensure_not_in_fridge(already_present: bool) -> Result<(), ApiError> {
    if already_present {
        return Err(ApiError::conflict("product already in fridge"));
    }
    Ok(())
}

fn check_quantity(quantity: i32) -> Result<(), ApiError> {
    if quantity < 1 {
        return Err(ApiError::validation("quantity must be at least 1"));
    }
    Ok(())
}

fn check_expiry(today: Date, expires_on: Date) -> Result<(), ApiError> {
    if expires_on < today {
        return Err(ApiError::validation("expiry date must not be in the past"));
    }
    Ok(())
}

fn validate_location(location: Option<&str>) -> Result<String, ApiError> {
    let location = location.unwrap_or("cool");
    if location != "cool" && location != "freeze" {
        return Err(ApiError::validation("location must be 'cool' or 'freeze'"));
    }
    Ok(location.to_string())
}

fn annotate(row: FridgeItemRow, days_remaining: i64, urgency: Urgency) -> NotificationItem {
    NotificationItem {
        id: row.id,
        product_id: row.product_id,
        product_name: row.product_name,
        unit: row.unit,
        category_name: row.category_name,
        quantity: row.quantity,
        location: row.location,
        expires_on: row.expires_on,
        days_remaining,
        urgency,
        urgency_text: expiry::urgency_text(urgency, days_remaining),
    }
}

/// Build the notification listing: expired items ordered by expiry date
/// ascending, then expiring-soon items ordered the same way, concatenated.
/// Anything past the notification window is dropped.
pub fn assemble_notifications(
    today: Date,
    mut expired: Vec<FridgeItemRow>,
    mut expiring: Vec<FridgeItemRow>,
) -> NotificationResponse {
    expired.sort_by_key(|r| r.expires_on);
    expiring.sort_by_key(|r| r.expires_on);

    let mut items = Vec::with_capacity(expired.len() + expiring.len());
    for row in expired.into_iter().chain(expiring) {
        if let Some((days, urgency)) = expiry::classify(today, row.expires_on) {
            items.push(annotate(row, days, urgency));
        }
    }

    NotificationResponse {
        total_expiring: items.len(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::OffsetDateTime;
    use uuid::Uuid;

    const TODAY: Date = date!(2025 - 03 - 10);

    fn item(name: &str, expires_on: Date) -> FridgeItemRow {
        FridgeItemRow {
            id: Uuid::new_v4(),
            fridge_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            unit: "kg".to_string(),
            category_name: None,
            quantity: 1,
            location: "cool".to_string(),
            expires_on,
            added_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn past_expiry_date_is_rejected() {
        let err = validate_new_item(TODAY, 1, date!(2025 - 03 - 09), None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("must not be in the past"));
    }

    #[test]
    fn expiring_today_is_accepted() {
        let location = validate_new_item(TODAY, 1, TODAY, None).unwrap();
        assert_eq!(location, "cool");
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let err = validate_new_item(TODAY, 0, date!(2025 - 03 - 12), None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn unknown_location_is_rejected() {
        let err = validate_new_item(TODAY, 1, date!(2025 - 03 - 12), Some("attic")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert_eq!(
            validate_new_item(TODAY, 1, date!(2025 - 03 - 12), Some("freeze")).unwrap(),
            "freeze"
        );
    }

    #[test]
    fn duplicate_product_is_a_conflict() {
        let err = ensure_not_in_fridge(true).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
        assert!(err.to_string().contains("already in fridge"));
        assert!(ensure_not_in_fridge(false).is_ok());
    }

    #[test]
    fn patch_validates_only_supplied_fields() {
        assert!(validate_item_patch(TODAY, None, None, None).unwrap().is_none());
        assert_eq!(
            validate_item_patch(TODAY, Some(2), Some(TODAY), Some("freeze")).unwrap(),
            Some("freeze".to_string())
        );

        let err = validate_item_patch(TODAY, None, Some(date!(2025 - 03 - 01)), None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        let err = validate_item_patch(TODAY, Some(0), None, None).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn notifications_list_expired_before_expiring_each_by_date() {
        // Deliberately shuffled input on both sides.
        let expired = vec![
            item("old milk", date!(2025 - 03 - 08)),
            item("older cheese", date!(2025 - 03 - 05)),
        ];
        let expiring = vec![
            item("yogurt", date!(2025 - 03 - 12)),
            item("ham", date!(2025 - 03 - 10)),
            item("eggs", date!(2025 - 03 - 11)),
        ];

        let resp = assemble_notifications(TODAY, expired, expiring);
        assert_eq!(resp.total_expiring, 5);

        let names: Vec<&str> = resp.items.iter().map(|i| i.product_name.as_str()).collect();
        assert_eq!(names, ["older cheese", "old milk", "ham", "eggs", "yogurt"]);

        assert_eq!(resp.items[0].urgency, Urgency::Expired);
        assert_eq!(resp.items[0].days_remaining, -5);
        assert_eq!(resp.items[2].urgency, Urgency::Critical);
        assert_eq!(resp.items[3].urgency, Urgency::High);
        assert_eq!(resp.items[4].urgency, Urgency::Medium);
        assert_eq!(resp.items[4].urgency_text, "expires in 2 days");
    }

    #[test]
    fn notifications_drop_items_past_the_window() {
        let expiring = vec![
            item("bread", date!(2025 - 03 - 13)),
            item("canned beans", date!(2025 - 06 - 01)),
        ];
        let resp = assemble_notifications(TODAY, Vec::new(), expiring);
        assert_eq!(resp.total_expiring, 1);
        assert_eq!(resp.items[0].product_name, "bread");
    }

    #[test]
    fn empty_fridge_yields_empty_notifications() {
        let resp = assemble_notifications(TODAY, Vec::new(), Vec::new());
        assert_eq!(resp.total_expiring, 0);
        assert!(resp.items.is_empty());
    }
}
