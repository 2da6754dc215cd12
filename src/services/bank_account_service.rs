use crate::entities::bank_account_entity as banks;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::validation::require_text;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone)]
pub struct BankAccountService {
    pool: DatabaseConnection,
}

impl BankAccountService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn list_accounts(&self) -> AppResult<Vec<BankAccountResponse>> {
        let accounts = banks::Entity::find()
            .order_by_asc(banks::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(accounts.into_iter().map(BankAccountResponse::from).collect())
    }

    pub async fn create_account(&self, req: BankAccountRequest) -> AppResult<BankAccountResponse> {
        let title = require_text("Title", &req.title)?;
        self.ensure_title_free(&title, None).await?;

        let created = banks::ActiveModel {
            title: Set(title),
            account_type: Set(req.account_type),
            initial_balance: Set(req.initial_balance),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;
        log::info!("Bank account created: {} (#{})", created.title, created.id);
        Ok(created.into())
    }

    pub async fn update_account(
        &self,
        id: i32,
        req: BankAccountRequest,
    ) -> AppResult<BankAccountResponse> {
        let title = require_text("Title", &req.title)?;
        let existing = banks::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bank account {id} not found")))?;
        self.ensure_title_free(&title, Some(id)).await?;

        let mut am = existing.into_active_model();
        am.title = Set(title);
        am.account_type = Set(req.account_type);
        am.initial_balance = Set(req.initial_balance);
        let updated = am.update(&self.pool).await?;
        Ok(updated.into())
    }

    /// Linked spendings and subscriptions keep their rows; the link is nulled.
    pub async fn delete_account(&self, id: i32) -> AppResult<()> {
        let res = banks::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Bank account {id} not found")));
        }
        log::info!("Bank account #{id} deleted");
        Ok(())
    }

    async fn ensure_title_free(&self, title: &str, except: Option<i32>) -> AppResult<()> {
        let mut query = banks::Entity::find().filter(banks::Column::Title.eq(title));
        if let Some(id) = except {
            query = query.filter(banks::Column::Id.ne(id));
        }
        if query.one(&self.pool).await?.is_some() {
            return Err(AppError::ValidationError(format!(
                "A bank account titled '{title}' already exists"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::entities::BankAccountType;

    fn request(title: &str) -> BankAccountRequest {
        BankAccountRequest {
            title: title.to_string(),
            account_type: BankAccountType::MobileWallet,
            initial_balance: None,
        }
    }

    #[tokio::test]
    async fn test_seeded_accounts_listed() {
        let svc = BankAccountService::new(test_pool().await);
        let accounts = svc.list_accounts().await.unwrap();
        let titles: Vec<_> = accounts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Habib Metro", "Meezan Bank", "HBL"]);
        assert_eq!(accounts[0].initial_balance, 0.0);
        assert_eq!(accounts[1].initial_balance, 1000.0);
    }

    #[tokio::test]
    async fn test_create_update_delete() {
        let svc = BankAccountService::new(test_pool().await);
        let created = svc.create_account(request("  JazzCash ")).await.unwrap();
        assert_eq!(created.title, "JazzCash");

        let updated = svc
            .update_account(
                created.id,
                BankAccountRequest {
                    title: "Easypaisa".into(),
                    account_type: BankAccountType::MobileWallet,
                    initial_balance: Some(250.0),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Easypaisa");
        assert_eq!(updated.initial_balance, 250.0);

        svc.delete_account(created.id).await.unwrap();
        assert!(matches!(
            svc.delete_account(created.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_and_blank_titles_rejected() {
        let svc = BankAccountService::new(test_pool().await);
        assert!(matches!(
            svc.create_account(request("HBL")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            svc.create_account(request("  ")).await,
            Err(AppError::ValidationError(_))
        ));
    }
}
