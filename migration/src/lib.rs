pub use sea_orm_migration::prelude::*;

mod m20250901_000001_initial;
mod m20250901_000002_seed_bank_accounts;
mod m20250902_000001_add_subscriptions;
mod m20250902_000002_add_subscription_alerts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_initial::Migration),
            Box::new(m20250901_000002_seed_bank_accounts::Migration),
            Box::new(m20250902_000001_add_subscriptions::Migration),
            Box::new(m20250902_000002_add_subscription_alerts::Migration),
        ]
    }
}
