use crate::entities::{bank_account_entity as banks, spending_entity as spendings};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::validation::{
    check_optional_usd, require_positive_pkr, require_text, resolve_bank_account,
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

#[derive(Clone)]
pub struct SpendingService {
    pool: DatabaseConnection,
}

impl SpendingService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn add_spending(&self, req: CreateSpendingRequest) -> AppResult<SpendingResponse> {
        let title = require_text("Title", &req.title)?;
        let category = require_text("Category", &req.category)?;
        require_positive_pkr(req.amount_pkr)?;
        check_optional_usd(req.amount_usd)?;
        let bank_account_id =
            resolve_bank_account(&self.pool, req.payment_method, req.bank_account_id).await?;

        let created = spendings::ActiveModel {
            title: Set(title),
            category: Set(category),
            amount_usd: Set(req.amount_usd),
            amount_pkr: Set(req.amount_pkr),
            date: Set(req.date),
            payment_method: Set(req.payment_method),
            bank_account_id: Set(bank_account_id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        let bank = match created.bank_account_id {
            Some(id) => banks::Entity::find_by_id(id).one(&self.pool).await?,
            None => None,
        };
        Ok(SpendingResponse::from_parts(created, bank))
    }

    /// Newest first, with the bank title joined in.
    pub async fn list_spendings(&self) -> AppResult<Vec<SpendingResponse>> {
        let rows = spendings::Entity::find()
            .find_also_related(banks::Entity)
            .order_by_desc(spendings::Column::Date)
            .order_by_desc(spendings::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(s, b)| SpendingResponse::from_parts(s, b))
            .collect())
    }

    pub async fn delete_spending(&self, id: i32) -> AppResult<()> {
        let res = spendings::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Spending {id} not found")));
        }
        Ok(())
    }
}
