use crate::m20250901_000001_initial::BankAccounts;
use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum Subscriptions {
    Table,
    Id,
    Title,
    Category,
    AmountUsd,
    AmountPkr,
    StartDate,
    ExpiryDate,
    PaymentMethod,
    BankAccountId,
    SubType,
    AlertEnabled,
    Active,
    PendingDeactivate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subscriptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subscriptions::Title).text().not_null())
                    .col(ColumnDef::new(Subscriptions::Category).text().not_null())
                    .col(ColumnDef::new(Subscriptions::AmountUsd).double().null())
                    .col(ColumnDef::new(Subscriptions::AmountPkr).double().not_null())
                    .col(ColumnDef::new(Subscriptions::StartDate).date().not_null())
                    .col(ColumnDef::new(Subscriptions::ExpiryDate).date().not_null())
                    .col(
                        ColumnDef::new(Subscriptions::PaymentMethod)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Subscriptions::BankAccountId).integer().null())
                    // single / monthly / yearly / lifetime
                    .col(
                        ColumnDef::new(Subscriptions::SubType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::AlertEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::PendingDeactivate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_subscriptions_bank_account")
                            .from(Subscriptions::Table, Subscriptions::BankAccountId)
                            .to(BankAccounts::Table, BankAccounts::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_subscriptions_expiry")
                    .table(Subscriptions::Table)
                    .col(Subscriptions::ExpiryDate)
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
                    .table(Subscriptions::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
