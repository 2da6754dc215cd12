use crate::models::{SpendingResponse, SubscriptionResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpendingKpis {
    pub total_pkr: f64,
    pub entries: u64,
    pub categories: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryTotal {
    pub category: String,
    pub total_pkr: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_pkr: f64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionKpis {
    /// Includes subscriptions with a pending deactivation
    pub active: u64,
    pub pending_deactivation: u64,
    pub inactive: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub spending: SpendingKpis,
    /// Sorted by total, largest first
    pub by_category: Vec<CategoryTotal>,
    /// Sorted by date, oldest first
    pub daily_trend: Vec<DailyTotal>,
    pub recent: Vec<SpendingResponse>,
    pub subscriptions: SubscriptionKpis,
    /// Active subscriptions expiring within the next week
    pub upcoming_renewals: Vec<SubscriptionResponse>,
}
