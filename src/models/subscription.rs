use crate::entities::{
    PaymentMethod, SubscriptionType, bank_account_entity, subscription_alert_entity,
    subscription_entity,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

fn default_alert_enabled() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub title: String,
    pub category: String,
    pub amount_pkr: f64,
    pub amount_usd: Option<f64>,
    pub start_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<i32>,
    pub sub_type: SubscriptionType,
    #[serde(default = "default_alert_enabled")]
    pub alert_enabled: bool,
}

/// Full edit of a subscription.
///
/// `active = false` does not stop the subscription immediately: it schedules
/// deactivation at the next expiry. `active = true` clears any pending
/// deactivation and reactivates an inactive record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateSubscriptionRequest {
    pub title: String,
    pub category: String,
    pub amount_pkr: f64,
    pub amount_usd: Option<f64>,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<i32>,
    pub sub_type: SubscriptionType,
    pub alert_enabled: bool,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionSort {
    /// Nearest expiry first
    #[default]
    Expiry,
    AmountDesc,
    AmountAsc,
    StartDesc,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubscriptionQuery {
    pub sub_type: Option<SubscriptionType>,
    pub alert_enabled: Option<bool>,
    pub active: Option<bool>,
    pub sort: Option<SubscriptionSort>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub amount_pkr: f64,
    pub amount_usd: Option<f64>,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<i32>,
    pub bank_title: Option<String>,
    pub sub_type: SubscriptionType,
    pub alert_enabled: bool,
    pub active: bool,
    pub pending_deactivate: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubscriptionResponse {
    pub fn from_parts(
        m: subscription_entity::Model,
        bank: Option<bank_account_entity::Model>,
    ) -> Self {
        Self {
            id: m.id,
            title: m.title,
            category: m.category,
            amount_pkr: m.amount_pkr,
            amount_usd: m.amount_usd,
            start_date: m.start_date,
            expiry_date: m.expiry_date,
            payment_method: m.payment_method,
            bank_account_id: m.bank_account_id,
            bank_title: bank.map(|b| b.title),
            sub_type: m.sub_type,
            alert_enabled: m.alert_enabled,
            active: m.active,
            pending_deactivate: m.pending_deactivate,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionAlertResponse {
    pub period_expiry: NaiveDate,
    pub alert_sent_at: DateTime<Utc>,
}

impl From<subscription_alert_entity::Model> for SubscriptionAlertResponse {
    fn from(m: subscription_alert_entity::Model) -> Self {
        Self {
            period_expiry: m.period_expiry,
            alert_sent_at: m.alert_sent_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct MaintenanceSummary {
    pub examined: u64,
    pub rolled: u64,
    pub deactivated: u64,
}

impl MaintenanceSummary {
    pub fn updated(&self) -> u64 {
        self.rolled + self.deactivated
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct AlertRunSummary {
    pub candidates: u64,
    pub sent: u64,
    pub already_sent: u64,
    pub not_yet_due: u64,
    pub failed: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AlertRunQuery {
    /// Evaluate even outside the configured alert hour
    #[serde(default)]
    pub force: bool,
}
