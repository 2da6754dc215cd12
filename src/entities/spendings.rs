use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "Online")]
    Online,
    #[sea_orm(string_value = "IBFT")]
    #[serde(rename = "IBFT")]
    Ibft,
    #[sea_orm(string_value = "Cash")]
    Cash,
}

impl PaymentMethod {
    /// Online and IBFT payments move money out of a bank account.
    pub fn requires_bank_account(&self) -> bool {
        matches!(self, PaymentMethod::Online | PaymentMethod::Ibft)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Online => write!(f, "Online"),
            PaymentMethod::Ibft => write!(f, "IBFT"),
            PaymentMethod::Cash => write!(f, "Cash"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "spendings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub category: String,
    pub amount_usd: Option<f64>,
    pub amount_pkr: f64,
    pub date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub bank_account_id: Option<i32>,
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
}

impl Related<super::bank_accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BankAccount.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
