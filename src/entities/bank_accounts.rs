use sea_orm::entity::prelude::*;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(32))")]
pub enum BankAccountType {
    #[sea_orm(string_value = "Payroll")]
    Payroll,
    #[sea_orm(string_value = "Primary")]
    Primary,
    #[sea_orm(string_value = "Secondary")]
    Secondary,
    #[sea_orm(string_value = "Mobile Wallet")]
    #[serde(rename = "Mobile Wallet")]
    MobileWallet,
}

impl std::fmt::Display for BankAccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BankAccountType::Payroll => write!(f, "Payroll"),
            BankAccountType::Primary => write!(f, "Primary"),
            BankAccountType::Secondary => write!(f, "Secondary"),
            BankAccountType::MobileWallet => write!(f, "Mobile Wallet"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    #[sea_orm(column_name = "type")]
    pub account_type: BankAccountType,
    pub initial_balance: Option<f64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
