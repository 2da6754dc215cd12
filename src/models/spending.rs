use crate::entities::{PaymentMethod, bank_account_entity, spending_entity};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSpendingRequest {
    pub title: String,
    pub category: String,
    pub amount_pkr: f64,
    pub amount_usd: Option<f64>,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    /// Required for Online/IBFT, ignored for Cash.
    pub bank_account_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SpendingResponse {
    pub id: i32,
    pub title: String,
    pub category: String,
    pub amount_usd: Option<f64>,
    pub amount_pkr: f64,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<i32>,
    pub bank_title: Option<String>,
}

impl SpendingResponse {
    pub fn from_parts(
        m: spending_entity::Model,
        bank: Option<bank_account_entity::Model>,
    ) -> Self {
        Self {
            id: m.id,
            title: m.title,
            category: m.category,
            amount_usd: m.amount_usd,
            amount_pkr: m.amount_pkr,
            date: m.date,
            payment_method: m.payment_method,
            bank_account_id: m.bank_account_id,
            bank_title: bank.map(|b| b.title),
        }
    }
}
