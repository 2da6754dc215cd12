//! Expiry date arithmetic for subscriptions.

use crate::entities::SubscriptionType;
use chrono::{Duration, NaiveDate};

/// Length of the first period for every kind, counted from the start date.
pub const INITIAL_PERIOD_DAYS: i64 = 30;
pub const MONTHLY_PERIOD_DAYS: i64 = 30;
pub const YEARLY_PERIOD_DAYS: i64 = 364;

/// Expiry assigned at creation. Yearly subscriptions also start with a
/// 30-day first period; only later rolls use the yearly length.
///
/// `None` when the result falls outside the representable date range.
pub fn initial_expiry(start_date: NaiveDate) -> Option<NaiveDate> {
    start_date.checked_add_signed(Duration::days(INITIAL_PERIOD_DAYS))
}

/// Next expiry after `expiry` for the given kind. Single and lifetime
/// subscriptions have no cadence and are returned unchanged.
pub fn roll_expiry(kind: SubscriptionType, expiry: NaiveDate) -> Option<NaiveDate> {
    match kind {
        SubscriptionType::Monthly => {
            expiry.checked_add_signed(Duration::days(MONTHLY_PERIOD_DAYS))
        }
        SubscriptionType::Yearly => expiry.checked_add_signed(Duration::days(YEARLY_PERIOD_DAYS)),
        SubscriptionType::Single | SubscriptionType::Lifetime => Some(expiry),
    }
}
