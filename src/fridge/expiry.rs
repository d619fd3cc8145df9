//! Expiry urgency classification for fridge items.
//!
//! The notification feature flags items in the inclusive window
//! `today..today+3` plus everything already expired. The dashboard stats use
//! a narrower 1-day window on purpose; see [`STATS_SOON_WINDOW_DAYS`].

use serde::Serialize;
use time::{Date, OffsetDateTime};

/// Items expiring within this many days show up in notifications.
pub const NOTIFY_WINDOW_DAYS: i64 = 3;

/// The dashboard "expiring soon" counter only looks one day ahead. This is
/// narrower than the notification window and preserved as observed behavior.
pub const STATS_SOON_WINDOW_DAYS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Expired,
    Critical,
    High,
    Medium,
}

pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Whole days between today and the expiry date; negative once expired.
pub fn days_remaining(today: Date, expires_on: Date) -> i64 {
    (expires_on - today).whole_days()
}

/// Classify an item's expiry urgency. Returns `None` for items more than
/// [`NOTIFY_WINDOW_DAYS`] days out, which are excluded from notifications.
pub fn classify(today: Date, expires_on: Date) -> Option<(i64, Urgency)> {
    let days = days_remaining(today, expires_on);
    let urgency = match days {
        d if d < 0 => Urgency::Expired,
        0 => Urgency::Critical,
        1 => Urgency::High,
        2..=NOTIFY_WINDOW_DAYS => Urgency::Medium,
        _ => return None,
    };
    Some((days, urgency))
}

/// Display label for a classified item.
pub fn urgency_text(urgency: Urgency, days_remaining: i64) -> String {
    match urgency {
        Urgency::Expired => "already expired".to_string(),
        Urgency::Critical => "expires today".to_string(),
        Urgency::High => "expires tomorrow".to_string(),
        Urgency::Medium => format!("expires in {days_remaining} days"),
    }
}

/// Flag used on fridge listings: expired or expiring within one day.
pub fn is_expiring_soon(today: Date, expires_on: Date) -> bool {
    days_remaining(today, expires_on) <= STATS_SOON_WINDOW_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    const TODAY: Date = date!(2025 - 03 - 10);

    #[test]
    fn expired_items_are_classified_expired() {
        let (days, urgency) = classify(TODAY, date!(2025 - 03 - 08)).unwrap();
        assert_eq!(days, -2);
        assert_eq!(urgency, Urgency::Expired);
        assert_eq!(urgency_text(urgency, days), "already expired");
    }

    #[test]
    fn expiring_today_is_critical() {
        let (days, urgency) = classify(TODAY, TODAY).unwrap();
        assert_eq!(days, 0);
        assert_eq!(urgency, Urgency::Critical);
        assert_eq!(urgency_text(urgency, days), "expires today");
    }

    #[test]
    fn expiring_tomorrow_is_high() {
        let (days, urgency) = classify(TODAY, date!(2025 - 03 - 11)).unwrap();
        assert_eq!(days, 1);
        assert_eq!(urgency, Urgency::High);
        assert_eq!(urgency_text(urgency, days), "expires tomorrow");
    }

    #[test]
    fn two_and_three_days_out_are_medium() {
        for (expires, days) in [(date!(2025 - 03 - 12), 2), (date!(2025 - 03 - 13), 3)] {
            let (d, urgency) = classify(TODAY, expires).unwrap();
            assert_eq!(d, days);
            assert_eq!(urgency, Urgency::Medium);
            assert_eq!(urgency_text(urgency, d), format!("expires in {days} days"));
        }
    }

    #[test]
    fn beyond_window_is_excluded() {
        assert_eq!(classify(TODAY, date!(2025 - 03 - 14)), None);
        assert_eq!(classify(TODAY, date!(2026 - 03 - 10)), None);
    }

    #[test]
    fn expiring_soon_flag_uses_one_day_window() {
        assert!(is_expiring_soon(TODAY, date!(2025 - 03 - 09)));
        assert!(is_expiring_soon(TODAY, TODAY));
        assert!(is_expiring_soon(TODAY, date!(2025 - 03 - 11)));
        assert!(!is_expiring_soon(TODAY, date!(2025 - 03 - 12)));
    }
}
