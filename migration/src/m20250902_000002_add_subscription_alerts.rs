use crate::m20250902_000001_add_subscriptions::Subscriptions;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum SubscriptionAlerts {
    Table,
    Id,
    SubscriptionId,
    PeriodExpiry,
    AlertSentAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionAlerts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionAlerts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionAlerts::SubscriptionId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionAlerts::PeriodExpiry)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionAlerts::AlertSentAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscription_alerts_subscription")
                            .from(SubscriptionAlerts::Table, SubscriptionAlerts::SubscriptionId)
                            .to(Subscriptions::Table, Subscriptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // one alert per (subscription, period)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_subscription_alerts_period")
                    .table(SubscriptionAlerts::Table)
                    .col(SubscriptionAlerts::SubscriptionId)
                    .col(SubscriptionAlerts::PeriodExpiry)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(SubscriptionAlerts::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
