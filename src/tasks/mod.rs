//! Background scheduled tasks for the application.
//!
//! Two loops run for the lifetime of the process: the nightly renewal alert
//! run at the configured local hour, and a periodic maintenance pass.
//! Call `spawn_all` once during startup to launch them.

use crate::config::AlertConfig;
use crate::services::{AlertService, MaintenanceService};
use crate::utils::Clock;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use std::sync::Arc;

/// Time left until the next `alert_hour:00` on the wall clock of `now`.
/// A run that would start exactly now is pushed to the following day.
pub fn duration_until_next_run(
    now: DateTime<FixedOffset>,
    alert_hour: u32,
) -> std::time::Duration {
    let Some(at) = NaiveTime::from_hms_opt(alert_hour, 0, 0) else {
        return std::time::Duration::from_secs(3600);
    };
    let local = now.naive_local();
    let mut next = local.date().and_time(at);
    if next <= local {
        next += Duration::days(1);
    }
    (next - local)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(3600))
}

/// Spawn all background tasks. Detaches via `tokio::spawn`; does not block.
pub fn spawn_all(
    maintenance_service: MaintenanceService,
    alert_service: AlertService,
    clock: Arc<dyn Clock>,
    config: AlertConfig,
) {
    // renewal alerts, once a day at the alert hour
    {
        let svc = alert_service.clone();
        let alert_hour = config.alert_hour;
        tokio::spawn(async move {
            loop {
                let wait = duration_until_next_run(clock.now(), alert_hour);
                log::debug!("Next renewal alert run in {}s", wait.as_secs());
                tokio::time::sleep(wait).await;

                // the alert run applies maintenance first
                if let Err(e) = svc.run_due_alerts().await {
                    log::error!("Renewal alert run failed: {e:?}");
                }
            }
        });
    }

    // maintenance on a fixed interval
    {
        let svc = maintenance_service.clone();
        let interval = std::time::Duration::from_secs(config.maintenance_interval_secs.max(60));
        tokio::spawn(async move {
            loop {
                match svc.run().await {
                    Ok(summary) if summary.updated() > 0 => log::info!(
                        "Scheduled maintenance updated {} subscriptions",
                        summary.updated()
                    ),
                    Ok(_) => {}
                    Err(e) => log::error!("Scheduled maintenance failed: {e:?}"),
                }
                tokio::time::sleep(interval).await;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pkt(day: u32, h: u32, m: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(5 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 6, day, h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_later_today() {
        let wait = duration_until_next_run(pkt(10, 20, 30), 21);
        assert_eq!(wait.as_secs(), 30 * 60);
    }

    #[test]
    fn test_rolls_to_tomorrow() {
        assert_eq!(
            duration_until_next_run(pkt(10, 21, 0), 21).as_secs(),
            24 * 3600
        );
        assert_eq!(
            duration_until_next_run(pkt(10, 22, 0), 21).as_secs(),
            23 * 3600
        );
    }

    #[test]
    fn test_uses_local_wall_clock() {
        // 15:00 UTC is 20:00 in UTC+5
        let utc_evening = chrono::Utc
            .with_ymd_and_hms(2025, 6, 10, 15, 0, 0)
            .unwrap()
            .with_timezone(&FixedOffset::east_opt(5 * 3600).unwrap());
        assert_eq!(duration_until_next_run(utc_evening, 21).as_secs(), 3600);
    }
}
