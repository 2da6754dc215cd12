//! Subscription maintenance: brings `active` and `expiry_date` up to date with
//! the current date before anything reads subscriptions.

use crate::entities::{SubscriptionType, subscription_entity as subs};
use crate::error::AppResult;
use crate::models::MaintenanceSummary;
use crate::utils::{Clock, roll_expiry};
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use std::sync::Arc;

/// Field changes the pass wants to persist for one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceUpdate {
    Deactivate,
    Roll { expiry_date: NaiveDate },
}

/// Decide what, if anything, to change on `sub` as of `today`.
///
/// Returns `None` for subscriptions that are already consistent, so running
/// the pass twice never writes on the second run.
pub fn plan_maintenance(sub: &subs::Model, today: NaiveDate) -> Option<MaintenanceUpdate> {
    if !sub.active || sub.expiry_date >= today {
        return None;
    }
    match sub.sub_type {
        SubscriptionType::Single => Some(MaintenanceUpdate::Deactivate),
        SubscriptionType::Monthly | SubscriptionType::Yearly => {
            if sub.pending_deactivate {
                return Some(MaintenanceUpdate::Deactivate);
            }
            // catch up on every period missed since the last run
            let mut expiry = sub.expiry_date;
            while expiry < today {
                let Some(next) = roll_expiry(sub.sub_type, expiry) else {
                    break;
                };
                expiry = next;
            }
            (expiry != sub.expiry_date).then_some(MaintenanceUpdate::Roll {
                expiry_date: expiry,
            })
        }
        SubscriptionType::Lifetime => sub
            .pending_deactivate
            .then_some(MaintenanceUpdate::Deactivate),
    }
}

#[derive(Clone)]
pub struct MaintenanceService {
    pool: DatabaseConnection,
    clock: Arc<dyn Clock>,
}

impl MaintenanceService {
    pub fn new(pool: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Apply the maintenance rules to every active subscription.
    pub async fn run(&self) -> AppResult<MaintenanceSummary> {
        let today = self.clock.today();
        let touched_at = self.clock.now().with_timezone(&Utc);

        let active = subs::Entity::find()
            .filter(subs::Column::Active.eq(true))
            .order_by_asc(subs::Column::Id)
            .all(&self.pool)
            .await?;

        let mut summary = MaintenanceSummary::default();
        for sub in active {
            summary.examined += 1;
            let Some(update) = plan_maintenance(&sub, today) else {
                continue;
            };

            let id = sub.id;
            let mut am = sub.into_active_model();
            match update {
                MaintenanceUpdate::Deactivate => {
                    am.active = Set(false);
                    summary.deactivated += 1;
                    log::info!("Subscription #{id} deactivated");
                }
                MaintenanceUpdate::Roll { expiry_date } => {
                    am.expiry_date = Set(expiry_date);
                    summary.rolled += 1;
                    log::debug!("Subscription #{id} rolled to {expiry_date}");
                }
            }
            am.updated_at = Set(touched_at);
            am.update(&self.pool).await?;
        }

        if summary.updated() > 0 {
            log::info!(
                "Subscription maintenance: examined={} rolled={} deactivated={}",
                summary.examined,
                summary.rolled,
                summary.deactivated
            );
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::entities::PaymentMethod;
    use crate::utils::FixedClock;
    use chrono::{Duration, FixedOffset, TimeZone};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn model(kind: SubscriptionType, expiry: NaiveDate, pending: bool) -> subs::Model {
        subs::Model {
            id: 1,
            title: "Netflix".into(),
            category: "Entertainment".into(),
            amount_usd: None,
            amount_pkr: 1100.0,
            start_date: expiry - Duration::days(30),
            expiry_date: expiry,
            payment_method: PaymentMethod::Cash,
            bank_account_id: None,
            sub_type: kind,
            alert_enabled: true,
            active: true,
            pending_deactivate: pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_monthly_catches_up_three_periods() {
        let sub = model(SubscriptionType::Monthly, today() - Duration::days(90), false);
        assert_eq!(
            plan_maintenance(&sub, today()),
            Some(MaintenanceUpdate::Roll {
                expiry_date: today()
            })
        );
    }

    #[test]
    fn test_rolls_past_today_when_not_aligned() {
        let sub = model(SubscriptionType::Monthly, today() - Duration::days(1), false);
        assert_eq!(
            plan_maintenance(&sub, today()),
            Some(MaintenanceUpdate::Roll {
                expiry_date: today() + Duration::days(29)
            })
        );
        let yearly = model(SubscriptionType::Yearly, today() - Duration::days(10), false);
        assert_eq!(
            plan_maintenance(&yearly, today()),
            Some(MaintenanceUpdate::Roll {
                expiry_date: today() + Duration::days(354)
            })
        );
    }

    #[test]
    fn test_pending_deactivation_waits_for_expiry() {
        let expired = model(SubscriptionType::Monthly, today() - Duration::days(1), true);
        assert_eq!(
            plan_maintenance(&expired, today()),
            Some(MaintenanceUpdate::Deactivate)
        );
        let running = model(SubscriptionType::Monthly, today() + Duration::days(1), true);
        assert_eq!(plan_maintenance(&running, today()), None);
    }

    #[test]
    fn test_single_expires_after_its_date() {
        let yesterday = model(SubscriptionType::Single, today() - Duration::days(1), false);
        assert_eq!(
            plan_maintenance(&yesterday, today()),
            Some(MaintenanceUpdate::Deactivate)
        );
        let due_today = model(SubscriptionType::Single, today(), false);
        assert_eq!(plan_maintenance(&due_today, today()), None);
        let future = model(SubscriptionType::Single, today() + Duration::days(3), false);
        assert_eq!(plan_maintenance(&future, today()), None);
    }

    #[test]
    fn test_lifetime_only_stops_when_pending() {
        let past = today() - Duration::days(400);
        assert_eq!(
            plan_maintenance(&model(SubscriptionType::Lifetime, past, false), today()),
            None
        );
        assert_eq!(
            plan_maintenance(&model(SubscriptionType::Lifetime, past, true), today()),
            Some(MaintenanceUpdate::Deactivate)
        );
    }

    #[test]
    fn test_roll_stops_at_last_representable_date() {
        let sub = model(
            SubscriptionType::Yearly,
            NaiveDate::MAX - Duration::days(5),
            false,
        );
        assert_eq!(plan_maintenance(&sub, NaiveDate::MAX), None);

        let near = model(
            SubscriptionType::Monthly,
            NaiveDate::MAX - Duration::days(40),
            false,
        );
        assert_eq!(
            plan_maintenance(&near, NaiveDate::MAX),
            Some(MaintenanceUpdate::Roll {
                expiry_date: NaiveDate::MAX - Duration::days(10)
            })
        );
    }

    #[test]
    fn test_inactive_untouched() {
        let mut sub = model(SubscriptionType::Monthly, today() - Duration::days(60), false);
        sub.active = false;
        assert_eq!(plan_maintenance(&sub, today()), None);
    }

    async fn insert(
        pool: &DatabaseConnection,
        kind: SubscriptionType,
        expiry: NaiveDate,
        pending: bool,
    ) -> subs::Model {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        subs::ActiveModel {
            title: Set(format!("{kind} sub")),
            category: Set("Productivity".into()),
            amount_usd: Set(Some(10.0)),
            amount_pkr: Set(2800.0),
            start_date: Set(expiry - Duration::days(30)),
            expiry_date: Set(expiry),
            payment_method: Set(PaymentMethod::Cash),
            bank_account_id: Set(None),
            sub_type: Set(kind),
            alert_enabled: Set(true),
            active: Set(true),
            pending_deactivate: Set(pending),
            created_at: Set(created),
            updated_at: Set(created),
            ..Default::default()
        }
        .insert(pool)
        .await
        .unwrap()
    }

    fn clock() -> Arc<FixedClock> {
        let offset = FixedOffset::east_opt(5 * 3600).unwrap();
        Arc::new(FixedClock::new(
            offset.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_run_persists_and_is_idempotent() {
        let pool = test_pool().await;
        let monthly = insert(&pool, SubscriptionType::Monthly, today() - Duration::days(90), false).await;
        let pending = insert(&pool, SubscriptionType::Yearly, today() - Duration::days(1), true).await;
        let single = insert(&pool, SubscriptionType::Single, today() - Duration::days(1), false).await;
        let fresh = insert(&pool, SubscriptionType::Monthly, today() + Duration::days(5), false).await;

        let svc = MaintenanceService::new(pool.clone(), clock());
        let first = svc.run().await.unwrap();
        assert_eq!(
            first,
            MaintenanceSummary {
                examined: 4,
                rolled: 1,
                deactivated: 2
            }
        );

        let reload = |id| {
            let pool = pool.clone();
            async move { subs::Entity::find_by_id(id).one(&pool).await.unwrap().unwrap() }
        };
        let m = reload(monthly.id).await;
        assert_eq!(m.expiry_date, today());
        assert!(m.active);
        assert_ne!(m.updated_at, monthly.updated_at);
        assert!(!reload(pending.id).await.active);
        assert_eq!(reload(pending.id).await.expiry_date, pending.expiry_date);
        assert!(!reload(single.id).await.active);
        assert_eq!(reload(fresh.id).await, fresh);

        let snapshot = subs::Entity::find().all(&pool).await.unwrap();
        let second = svc.run().await.unwrap();
        assert_eq!(second.updated(), 0);
        assert_eq!(subs::Entity::find().all(&pool).await.unwrap(), snapshot);
    }
}
