use crate::entities::subscription_alert_entity as ledger;
use crate::error::AppResult;
use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::sea_query::{OnConflict, Query};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Persisted record of which (subscription, period) pairs were already
/// notified. The unique index on the pair is the only thing that keeps two
/// concurrent runs from both recording a send.
#[derive(Clone)]
pub struct AlertLedgerService {
    pool: DatabaseConnection,
}

impl AlertLedgerService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn has_alert(
        &self,
        subscription_id: i32,
        period_expiry: NaiveDate,
    ) -> AppResult<bool> {
        let found = ledger::Entity::find()
            .filter(ledger::Column::SubscriptionId.eq(subscription_id))
            .filter(ledger::Column::PeriodExpiry.eq(period_expiry))
            .one(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Insert the marker; returns `false` if it already existed.
    pub async fn record_alert(
        &self,
        subscription_id: i32,
        period_expiry: NaiveDate,
        sent_at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let insert = Query::insert()
            .into_table(ledger::Entity)
            .columns([
                ledger::Column::SubscriptionId,
                ledger::Column::PeriodExpiry,
                ledger::Column::AlertSentAt,
            ])
            .values_panic([
                subscription_id.into(),
                period_expiry.into(),
                sent_at.into(),
            ])
            .on_conflict(
                OnConflict::columns([
                    ledger::Column::SubscriptionId,
                    ledger::Column::PeriodExpiry,
                ])
                .do_nothing()
                .to_owned(),
            )
            .to_owned();
        let stmt = self.pool.get_database_backend().build(&insert);
        let res = self.pool.execute(stmt).await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn list_for_subscription(
        &self,
        subscription_id: i32,
    ) -> AppResult<Vec<ledger::Model>> {
        let rows = ledger::Entity::find()
            .filter(ledger::Column::SubscriptionId.eq(subscription_id))
            .order_by_desc(ledger::Column::PeriodExpiry)
            .all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::entities::{PaymentMethod, SubscriptionType, subscription_entity as subs};
    use sea_orm::{ActiveModelTrait, Set};

    async fn subscription(pool: &DatabaseConnection) -> i32 {
        let expiry = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        subs::ActiveModel {
            title: Set("Spotify".into()),
            category: Set("Entertainment".into()),
            amount_usd: Set(None),
            amount_pkr: Set(349.0),
            start_date: Set(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()),
            expiry_date: Set(expiry),
            payment_method: Set(PaymentMethod::Cash),
            bank_account_id: Set(None),
            sub_type: Set(SubscriptionType::Monthly),
            alert_enabled: Set(true),
            active: Set(true),
            pending_deactivate: Set(false),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(pool)
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_record_is_idempotent_per_period() {
        let pool = test_pool().await;
        let id = subscription(&pool).await;
        let ledger = AlertLedgerService::new(pool);
        let period = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let next = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();

        assert!(!ledger.has_alert(id, period).await.unwrap());
        assert!(ledger.record_alert(id, period, Utc::now()).await.unwrap());
        assert!(!ledger.record_alert(id, period, Utc::now()).await.unwrap());
        assert!(ledger.has_alert(id, period).await.unwrap());
        assert!(!ledger.has_alert(id, next).await.unwrap());

        assert!(ledger.record_alert(id, next, Utc::now()).await.unwrap());
        let rows = ledger.list_for_subscription(id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period_expiry, next);
    }

    #[tokio::test]
    async fn test_rows_removed_with_subscription() {
        let pool = test_pool().await;
        let id = subscription(&pool).await;
        let ledger = AlertLedgerService::new(pool.clone());
        let period = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        ledger.record_alert(id, period, Utc::now()).await.unwrap();

        subs::Entity::delete_by_id(id).exec(&pool).await.unwrap();
        assert!(ledger.list_for_subscription(id).await.unwrap().is_empty());
    }
}
