use crate::entities::{BankAccountType, bank_account_entity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BankAccountRequest {
    pub title: String,
    pub account_type: BankAccountType,
    pub initial_balance: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BankAccountResponse {
    pub id: i32,
    pub title: String,
    pub account_type: BankAccountType,
    /// Missing balances are reported as 0.
    pub initial_balance: f64,
}

impl From<bank_account_entity::Model> for BankAccountResponse {
    fn from(m: bank_account_entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            account_type: m.account_type,
            initial_balance: m.initial_balance.unwrap_or(0.0),
        }
    }
}
