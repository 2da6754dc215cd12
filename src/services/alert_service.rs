//! Renewal reminders: one email per subscription period, sent `lead_days`
//! before the expiry date at the configured local hour.

use crate::config::AlertConfig;
use crate::entities::{SubscriptionType, subscription_entity as subs};
use crate::error::{AppError, AppResult};
use crate::external::{EmailMessage, Mailer};
use crate::models::AlertRunSummary;
use crate::services::{AlertLedgerService, MaintenanceService};
use crate::utils::Clock;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::sync::Arc;

/// Moment the reminder for the period ending on `expiry` becomes due.
pub fn due_at(
    expiry: NaiveDate,
    lead_days: i64,
    alert_hour: u32,
    offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    let day = expiry.checked_sub_signed(Duration::days(lead_days))?;
    let local = day.and_hms_opt(alert_hour, 0, 0)?;
    offset.from_local_datetime(&local).single()
}

pub fn compose_alert(sub: &subs::Model, recipient: &str, lead_days: i64) -> EmailMessage {
    let date = sub.expiry_date.format("%Y-%m-%d");
    if sub.sub_type == SubscriptionType::Single {
        return EmailMessage {
            to: recipient.to_string(),
            subject: format!("Subscription ending: {}", sub.title),
            body: format!("Your subscription \"{}\" ends on {date}.", sub.title),
        };
    }

    let usd = sub
        .amount_usd
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string());
    EmailMessage {
        to: recipient.to_string(),
        subject: format!("Upcoming renewal: {} on {date}", sub.title),
        body: format!(
            "Your subscription renews in {lead_days} days.\n\n\
             Title: {}\n\
             Category: {}\n\
             Amount (PKR): {:.2}\n\
             Amount (USD): {usd}\n\
             Type: {}\n\
             Renewal date: {date}\n",
            sub.title, sub.category, sub.amount_pkr, sub.sub_type
        ),
    }
}

#[derive(Clone)]
pub struct AlertService {
    pool: DatabaseConnection,
    ledger: AlertLedgerService,
    maintenance: MaintenanceService,
    mailer: Arc<dyn Mailer>,
    clock: Arc<dyn Clock>,
    config: AlertConfig,
    offset: FixedOffset,
}

impl AlertService {
    pub fn new(
        pool: DatabaseConnection,
        mailer: Arc<dyn Mailer>,
        clock: Arc<dyn Clock>,
        config: AlertConfig,
    ) -> AppResult<Self> {
        let offset = config.offset().ok_or_else(|| {
            AppError::ConfigError(format!(
                "invalid alerts.utc_offset_minutes: {}",
                config.utc_offset_minutes
            ))
        })?;
        let ledger = AlertLedgerService::new(pool.clone());
        let maintenance = MaintenanceService::new(pool.clone(), clock.clone());
        Ok(Self {
            pool,
            ledger,
            maintenance,
            mailer,
            clock,
            config,
            offset,
        })
    }

    pub fn in_alert_window(&self, now: DateTime<FixedOffset>) -> bool {
        now.with_timezone(&self.offset).hour() == self.config.alert_hour
    }

    /// Request-driven entry point: does nothing outside the alert hour.
    pub async fn run_in_window(&self) -> AppResult<Option<AlertRunSummary>> {
        let now = self.clock.now();
        if !self.in_alert_window(now) {
            log::debug!(
                "Outside alert window ({}:00), skipping reminder evaluation",
                self.config.alert_hour
            );
            return Ok(None);
        }
        self.run_due_alerts().await.map(Some)
    }

    /// Evaluate every alert candidate now. A failure on one subscription is
    /// logged and counted; it never stops the others.
    pub async fn run_due_alerts(&self) -> AppResult<AlertRunSummary> {
        self.maintenance.run().await?;
        let now = self.clock.now();

        let candidates = subs::Entity::find()
            .filter(subs::Column::AlertEnabled.eq(true))
            .filter(subs::Column::Active.eq(true))
            .order_by_asc(subs::Column::Id)
            .all(&self.pool)
            .await?;

        let mut summary = AlertRunSummary::default();
        for sub in candidates.into_iter().filter(|s| s.sub_type.is_alertable()) {
            summary.candidates += 1;

            let Some(due) = due_at(
                sub.expiry_date,
                self.config.lead_days,
                self.config.alert_hour,
                self.offset,
            ) else {
                log::error!("Cannot compute due time for subscription #{}", sub.id);
                summary.failed += 1;
                continue;
            };
            if now < due {
                summary.not_yet_due += 1;
                continue;
            }

            match self.ledger.has_alert(sub.id, sub.expiry_date).await {
                Ok(true) => {
                    summary.already_sent += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => {
                    log::error!("Alert ledger lookup failed for #{}: {e}", sub.id);
                    summary.failed += 1;
                    continue;
                }
            }

            let message = compose_alert(&sub, &self.config.recipient, self.config.lead_days);
            if let Err(e) = self.mailer.send(&message).await {
                // not recorded, so the next run retries
                log::warn!("Renewal alert for #{} not sent: {e}", sub.id);
                summary.failed += 1;
                continue;
            }

            match self
                .ledger
                .record_alert(sub.id, sub.expiry_date, now.with_timezone(&Utc))
                .await
            {
                Ok(inserted) => {
                    if !inserted {
                        log::info!(
                            "Alert for #{} period {} was recorded by a concurrent run",
                            sub.id,
                            sub.expiry_date
                        );
                    }
                    summary.sent += 1;
                }
                Err(e) => {
                    log::error!("Failed to record alert for #{}: {e}", sub.id);
                    summary.failed += 1;
                }
            }
        }

        log::info!(
            "Renewal alerts: candidates={} sent={} already_sent={} not_yet_due={} failed={}",
            summary.candidates,
            summary.sent,
            summary.already_sent,
            summary.not_yet_due,
            summary.failed
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::entities::PaymentMethod;
    use crate::utils::FixedClock;
    use async_trait::async_trait;
    use sea_orm::{ActiveModelTrait, Set};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
        fail: AtomicBool,
    }

    impl RecordingMailer {
        fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> AppResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::ExternalApiError("smtp down".into()));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }

    fn pkt() -> FixedOffset {
        FixedOffset::east_opt(5 * 3600).unwrap()
    }

    fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
        pkt().with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    fn config() -> AlertConfig {
        AlertConfig {
            recipient: "me@example.com".into(),
            ..AlertConfig::default()
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
    }

    async fn insert(
        pool: &DatabaseConnection,
        kind: SubscriptionType,
        expiry: NaiveDate,
        alert_enabled: bool,
    ) -> subs::Model {
        subs::ActiveModel {
            title: Set("Netflix".into()),
            category: Set("Entertainment".into()),
            amount_usd: Set(Some(6.99)),
            amount_pkr: Set(1950.0),
            start_date: Set(expiry - Duration::days(30)),
            expiry_date: Set(expiry),
            payment_method: Set(PaymentMethod::Cash),
            bank_account_id: Set(None),
            sub_type: Set(kind),
            alert_enabled: Set(alert_enabled),
            active: Set(true),
            pending_deactivate: Set(false),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(pool)
        .await
        .unwrap()
    }

    fn service(
        pool: DatabaseConnection,
        mailer: Arc<RecordingMailer>,
        clock: Arc<FixedClock>,
    ) -> AlertService {
        AlertService::new(pool, mailer, clock, config()).unwrap()
    }

    #[test]
    fn test_due_at_two_days_before_at_alert_hour() {
        let due = due_at(date(20), 2, 21, pkt()).unwrap();
        assert_eq!(due, at(18, 21));
    }

    #[test]
    fn test_compose_single_and_recurring() {
        let mut sub = subs::Model {
            id: 7,
            title: "Udemy course".into(),
            category: "Productivity".into(),
            amount_usd: None,
            amount_pkr: 3000.0,
            start_date: date(1),
            expiry_date: date(20),
            payment_method: PaymentMethod::Cash,
            bank_account_id: None,
            sub_type: SubscriptionType::Single,
            alert_enabled: true,
            active: true,
            pending_deactivate: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let single = compose_alert(&sub, "me@example.com", 2);
        assert_eq!(single.to, "me@example.com");
        assert!(single.body.contains("ends on 2025-06-20"));

        sub.sub_type = SubscriptionType::Yearly;
        sub.amount_usd = Some(12.5);
        let renewal = compose_alert(&sub, "me@example.com", 2);
        assert!(renewal.subject.contains("Udemy course"));
        for part in [
            "Category: Productivity",
            "Amount (PKR): 3000.00",
            "Amount (USD): 12.50",
            "Type: yearly",
            "Renewal date: 2025-06-20",
        ] {
            assert!(renewal.body.contains(part), "missing {part}");
        }
    }

    #[tokio::test]
    async fn test_window_gate() {
        let pool = test_pool().await;
        insert(&pool, SubscriptionType::Monthly, date(16), true).await;
        let mailer = Arc::new(RecordingMailer::default());
        let clock = Arc::new(FixedClock::new(at(14, 20)));
        let svc = service(pool, mailer.clone(), clock.clone());

        assert_eq!(svc.run_in_window().await.unwrap(), None);
        assert!(mailer.sent().is_empty());

        clock.set(at(14, 21));
        let summary = svc.run_in_window().await.unwrap().unwrap();
        assert_eq!(summary.sent, 1);
    }

    #[tokio::test]
    async fn test_not_sent_before_due() {
        let pool = test_pool().await;
        insert(&pool, SubscriptionType::Monthly, date(20), true).await;
        let mailer = Arc::new(RecordingMailer::default());
        // due at 18th 21:00; a minute short of that
        let clock = Arc::new(FixedClock::new(
            pkt().with_ymd_and_hms(2025, 6, 18, 20, 59, 0).unwrap(),
        ));
        let svc = service(pool, mailer.clone(), clock);

        let summary = svc.run_due_alerts().await.unwrap();
        assert_eq!(summary.not_yet_due, 1);
        assert_eq!(summary.sent, 0);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_sends_once_per_period() {
        let pool = test_pool().await;
        let sub = insert(&pool, SubscriptionType::Monthly, date(20), true).await;
        let mailer = Arc::new(RecordingMailer::default());
        let clock = Arc::new(FixedClock::new(at(18, 21)));
        let svc = service(pool.clone(), mailer.clone(), clock);

        let first = svc.run_due_alerts().await.unwrap();
        let second = svc.run_due_alerts().await.unwrap();
        assert_eq!(first.sent, 1);
        assert_eq!(second.sent, 0);
        assert_eq!(second.already_sent, 1);
        assert_eq!(mailer.sent().len(), 1);

        let rows = AlertLedgerService::new(pool)
            .list_for_subscription(sub.id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].period_expiry, date(20));
    }

    #[tokio::test]
    async fn test_failed_send_is_retried() {
        let pool = test_pool().await;
        let sub = insert(&pool, SubscriptionType::Single, date(20), true).await;
        let mailer = Arc::new(RecordingMailer::default());
        mailer.fail.store(true, Ordering::SeqCst);
        let clock = Arc::new(FixedClock::new(at(19, 21)));
        let svc = service(pool.clone(), mailer.clone(), clock);
        let ledger = AlertLedgerService::new(pool);

        let failed = svc.run_due_alerts().await.unwrap();
        assert_eq!(failed.failed, 1);
        assert!(!ledger.has_alert(sub.id, date(20)).await.unwrap());

        mailer.fail.store(false, Ordering::SeqCst);
        let retried = svc.run_due_alerts().await.unwrap();
        assert_eq!(retried.sent, 1);
        assert!(ledger.has_alert(sub.id, date(20)).await.unwrap());
    }

    #[tokio::test]
    async fn test_one_failure_does_not_block_others() {
        struct PickyMailer {
            delivered: Mutex<Vec<String>>,
        }

        #[async_trait]
        impl Mailer for PickyMailer {
            async fn send(&self, message: &EmailMessage) -> AppResult<()> {
                if message.subject.contains("Broken") {
                    return Err(AppError::ExternalApiError("rejected".into()));
                }
                self.delivered.lock().unwrap().push(message.subject.clone());
                Ok(())
            }
        }

        let pool = test_pool().await;
        let broken = insert(&pool, SubscriptionType::Monthly, date(20), true).await;
        let mut am: subs::ActiveModel = broken.into();
        am.title = Set("Broken".into());
        am.update(&pool).await.unwrap();
        insert(&pool, SubscriptionType::Yearly, date(20), true).await;

        let mailer = Arc::new(PickyMailer {
            delivered: Mutex::new(Vec::new()),
        });
        let clock = Arc::new(FixedClock::new(at(18, 22)));
        let svc = AlertService::new(pool, mailer.clone(), clock, config()).unwrap();

        let summary = svc.run_due_alerts().await.unwrap();
        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.sent, 1);
        assert_eq!(mailer.delivered.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_skips_lifetime_and_disabled() {
        let pool = test_pool().await;
        insert(&pool, SubscriptionType::Lifetime, date(20), true).await;
        insert(&pool, SubscriptionType::Monthly, date(20), false).await;
        let mailer = Arc::new(RecordingMailer::default());
        let clock = Arc::new(FixedClock::new(at(19, 21)));
        let svc = service(pool, mailer.clone(), clock);

        let summary = svc.run_due_alerts().await.unwrap();
        assert_eq!(summary.candidates, 0);
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_next_period_alerts_again_after_roll() {
        let pool = test_pool().await;
        let sub = insert(&pool, SubscriptionType::Monthly, date(20), true).await;
        let mailer = Arc::new(RecordingMailer::default());
        let clock = Arc::new(FixedClock::new(at(18, 21)));
        let svc = service(pool.clone(), mailer.clone(), clock.clone());
        svc.run_due_alerts().await.unwrap();

        // 30 days on: expiry rolls to July 20, due July 18 21:00
        clock.set(pkt().with_ymd_and_hms(2025, 7, 18, 21, 0, 0).unwrap());
        let summary = svc.run_due_alerts().await.unwrap();
        assert_eq!(summary.sent, 1);
        assert_eq!(mailer.sent().len(), 2);
        let rows = AlertLedgerService::new(pool)
            .list_for_subscription(sub.id)
            .await
            .unwrap();
        assert_eq!(rows.len(), 2);
    }
}
