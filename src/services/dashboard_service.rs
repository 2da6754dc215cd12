use crate::entities::{
    bank_account_entity as banks, spending_entity as spendings, subscription_entity as subs,
};
use crate::error::AppResult;
use crate::models::*;
use crate::services::MaintenanceService;
use crate::utils::Clock;
use chrono::{Duration, NaiveDate};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::BTreeMap;
use std::sync::Arc;

const RECENT_SPENDINGS: usize = 10;
const UPCOMING_WINDOW_DAYS: i64 = 7;

#[derive(Clone)]
pub struct DashboardService {
    pool: DatabaseConnection,
    maintenance: MaintenanceService,
    clock: Arc<dyn Clock>,
}

impl DashboardService {
    pub fn new(pool: DatabaseConnection, clock: Arc<dyn Clock>) -> Self {
        Self {
            maintenance: MaintenanceService::new(pool.clone(), clock.clone()),
            pool,
            clock,
        }
    }

    pub async fn overview(&self) -> AppResult<DashboardResponse> {
        self.maintenance.run().await?;
        let today = self.clock.today();

        let spending_rows = spendings::Entity::find()
            .find_also_related(banks::Entity)
            .order_by_desc(spendings::Column::Date)
            .order_by_desc(spendings::Column::Id)
            .all(&self.pool)
            .await?;
        let recent: Vec<SpendingResponse> = spending_rows
            .iter()
            .take(RECENT_SPENDINGS)
            .cloned()
            .map(|(s, b)| SpendingResponse::from_parts(s, b))
            .collect();
        let rows: Vec<spendings::Model> = spending_rows.into_iter().map(|(s, _)| s).collect();

        let by_category = category_totals(&rows);
        let spending = SpendingKpis {
            total_pkr: rows.iter().map(|s| s.amount_pkr).sum(),
            entries: rows.len() as u64,
            categories: by_category.len() as u64,
        };

        let all_subs = subs::Entity::find().all(&self.pool).await?;
        let subscriptions = SubscriptionKpis {
            active: all_subs.iter().filter(|s| s.active).count() as u64,
            pending_deactivation: all_subs
                .iter()
                .filter(|s| s.active && s.pending_deactivate)
                .count() as u64,
            inactive: all_subs.iter().filter(|s| !s.active).count() as u64,
        };

        let horizon = today + Duration::days(UPCOMING_WINDOW_DAYS);
        let upcoming = subs::Entity::find()
            .find_also_related(banks::Entity)
            .filter(subs::Column::Active.eq(true))
            .filter(subs::Column::ExpiryDate.gte(today))
            .filter(subs::Column::ExpiryDate.lte(horizon))
            .order_by_asc(subs::Column::ExpiryDate)
            .order_by_asc(subs::Column::Id)
            .all(&self.pool)
            .await?;

        Ok(DashboardResponse {
            spending,
            by_category,
            daily_trend: daily_totals(&rows),
            recent,
            subscriptions,
            upcoming_renewals: upcoming
                .into_iter()
                .map(|(s, b)| SubscriptionResponse::from_parts(s, b))
                .collect(),
        })
    }
}

fn category_totals(rows: &[spendings::Model]) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for s in rows {
        *totals.entry(s.category.as_str()).or_default() += s.amount_pkr;
    }
    let mut out: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total_pkr)| CategoryTotal {
            category: category.to_string(),
            total_pkr,
        })
        .collect();
    // stable sort keeps equal totals in name order
    out.sort_by(|a, b| b.total_pkr.total_cmp(&a.total_pkr));
    out
}

fn daily_totals(rows: &[spendings::Model]) -> Vec<DailyTotal> {
    let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for s in rows {
        *totals.entry(s.date).or_default() += s.amount_pkr;
    }
    totals
        .into_iter()
        .map(|(date, total_pkr)| DailyTotal { date, total_pkr })
        .collect()
}
