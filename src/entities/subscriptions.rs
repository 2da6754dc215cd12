use crate::entities::PaymentMethod;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionType {
    #[sea_orm(string_value = "single")]
    Single,
    #[sea_orm(string_value = "monthly")]
    Monthly,
    #[sea_orm(string_value = "yearly")]
    Yearly,
    #[sea_orm(string_value = "lifetime")]
    Lifetime,
}

impl SubscriptionType {
    /// Lifetime subscriptions never get renewal reminders.
    pub fn is_alertable(&self) -> bool {
        !matches!(self, SubscriptionType::Lifetime)
    }
}

impl std::fmt::Display for SubscriptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionType::Single => write!(f, "single"),
            SubscriptionType::Monthly => write!(f, "monthly"),
            SubscriptionType::Yearly => write!(f, "yearly"),
            SubscriptionType::Lifetime => write!(f, "lifetime"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub category: String,
    pub amount_usd: Option<f64>,
    pub amount_pkr: f64,
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<i32>,
    pub sub_type: SubscriptionType,
    pub alert_enabled: bool,
    pub active: bool,
    pub pending_deactivate: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bank_accounts::Entity",
        from = "Column::BankAccountId",
        to = "super::bank_accounts::Column::Id",
        on_delete = "SetNull"
    )]
    BankAccount,
    #[sea_orm(has_many = "super::subscription_alerts::Entity")]
    Alerts,
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccount.def()
    }
}

impl Related<super::subscription_alerts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alerts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
