use crate::entities::{bank_account_entity as banks, subscription_entity as subs};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::validation::{
    check_optional_usd, require_positive_pkr, require_text, resolve_bank_account,
};
use crate::services::{AlertLedgerService, MaintenanceService};
use crate::utils::{Clock, initial_expiry};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct SubscriptionService {
    pool: DatabaseConnection,
    maintenance: MaintenanceService,
    ledger: AlertLedgerService,
    clock: Arc<dyn Clock>,
}

impl SubscriptionService {
    pub fn new(pool: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self {
            maintenance: MaintenanceService::new(pool.clone(), clock.clone()),
            ledger: AlertLedgerService::new(pool.clone()),
            pool,
            clock,
        }
    }

    pub async fn create_subscription(
        &self,
        req: CreateSubscriptionRequest,
    ) -> AppResult<SubscriptionResponse> {
        let title = require_text("Title", &req.title)?;
        let category = require_text("Category", &req.category)?;
        require_positive_pkr(req.amount_pkr)?;
        check_optional_usd(req.amount_usd)?;
        let expiry_date = initial_expiry(req.start_date)
            .ok_or_else(|| AppError::ValidationError("Start date out of range".into()))?;
        let bank_account_id =
            resolve_bank_account(&self.pool, req.payment_method, req.bank_account_id).await?;

        let now = self.clock.now().with_timezone(&Utc);
        let created = subs::ActiveModel {
            title: Set(title),
            category: Set(category),
            amount_usd: Set(req.amount_usd),
            amount_pkr: Set(req.amount_pkr),
            start_date: Set(req.start_date),
            expiry_date: Set(expiry_date),
            payment_method: Set(req.payment_method),
            bank_account_id: Set(bank_account_id),
            sub_type: Set(req.sub_type),
            alert_enabled: Set(req.alert_enabled),
            active: Set(true),
            pending_deactivate: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Subscription #{} created ({}, expires {})",
            created.id,
            created.sub_type,
            created.expiry_date
        );
        self.with_bank(created).await
    }

    pub async fn get_subscription(&self, id: i32) -> AppResult<SubscriptionResponse> {
        let sub = self.find(id).await?;
        self.with_bank(sub).await
    }

    /// Apply a full edit. Turning `active` off only schedules deactivation
    /// for the next expiry; an inactive record stays inactive.
    pub async fn update_subscription(
        &self,
        id: i32,
        req: UpdateSubscriptionRequest,
    ) -> AppResult<SubscriptionResponse> {
        let existing = self.find(id).await?;

        let title = require_text("Title", &req.title)?;
        let category = require_text("Category", &req.category)?;
        require_positive_pkr(req.amount_pkr)?;
        check_optional_usd(req.amount_usd)?;
        let bank_account_id =
            resolve_bank_account(&self.pool, req.payment_method, req.bank_account_id).await?;

        let (active, pending_deactivate) = match (req.active, existing.active) {
            (true, _) => (true, false),
            (false, true) => (true, true),
            (false, false) => (false, false),
        };

        let mut am = existing.into_active_model();
        am.title = Set(title);
        am.category = Set(category);
        am.amount_usd = Set(req.amount_usd);
        am.amount_pkr = Set(req.amount_pkr);
        am.start_date = Set(req.start_date);
        am.expiry_date = Set(req.expiry_date);
        am.payment_method = Set(req.payment_method);
        am.bank_account_id = Set(bank_account_id);
        am.sub_type = Set(req.sub_type);
        am.alert_enabled = Set(req.alert_enabled);
        am.active = Set(active);
        am.pending_deactivate = Set(pending_deactivate);
        am.updated_at = Set(self.clock.now().with_timezone(&Utc));
        let updated = am.update(&self.pool).await?;

        if updated.pending_deactivate {
            log::info!(
                "Subscription #{} will deactivate after {}",
                updated.id,
                updated.expiry_date
            );
        }
        self.with_bank(updated).await
    }

    /// Removes the subscription together with its alert history.
    pub async fn delete_subscription(&self, id: i32) -> AppResult<()> {
        let res = subs::Entity::delete_by_id(id).exec(&self.pool).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound(format!("Subscription {id} not found")));
        }
        log::info!("Subscription #{id} deleted");
        Ok(())
    }

    /// Maintenance is applied first, so listed expiries are always current.
    pub async fn list_subscriptions(
        &self,
        query: SubscriptionQuery,
    ) -> AppResult<Vec<SubscriptionResponse>> {
        self.maintenance.run().await?;

        let mut select = subs::Entity::find().find_also_related(banks::Entity);
        if let Some(kind) = query.sub_type {
            select = select.filter(subs::Column::SubType.eq(kind));
        }
        if let Some(enabled) = query.alert_enabled {
            select = select.filter(subs::Column::AlertEnabled.eq(enabled));
        }
        if let Some(active) = query.active {
            select = select.filter(subs::Column::Active.eq(active));
        }
        select = match query.sort.unwrap_or_default() {
            SubscriptionSort::Expiry => select.order_by_asc(subs::Column::ExpiryDate),
            SubscriptionSort::AmountDesc => select.order_by_desc(subs::Column::AmountPkr),
            SubscriptionSort::AmountAsc => select.order_by_asc(subs::Column::AmountPkr),
            SubscriptionSort::StartDesc => select.order_by_desc(subs::Column::StartDate),
        };

        let rows = select
            .order_by_asc(subs::Column::Id)
            .all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(s, b)| SubscriptionResponse::from_parts(s, b))
            .collect())
    }

    pub async fn list_alerts(&self, id: i32) -> AppResult<Vec<SubscriptionAlertResponse>> {
        self.find(id).await?;
        let rows = self.ledger.list_for_subscription(id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find(&self, id: i32) -> AppResult<subs::Model> {
        subs::Entity::find_by_id(id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Subscription {id} not found")))
    }

    async fn with_bank(&self, sub: subs::Model) -> AppResult<SubscriptionResponse> {
        let bank = match sub.bank_account_id {
            Some(id) => banks::Entity::find_by_id(id).one(&self.pool).await?,
            None => None,
        };
        Ok(SubscriptionResponse::from_parts(sub, bank))
    }
}
