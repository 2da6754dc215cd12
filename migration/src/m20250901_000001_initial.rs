use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub(crate) enum BankAccounts {
    Table,
    Id,
    Title,
    Type,
    InitialBalance,
}

#[derive(DeriveIden)]
enum Spendings {
    Table,
    Id,
    Title,
    Category,
    AmountUsd,
    AmountPkr,
    Date,
    PaymentMethod,
    BankAccountId,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BankAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BankAccounts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BankAccounts::Title)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    // Payroll / Primary / Secondary / Mobile Wallet
                    .col(ColumnDef::new(BankAccounts::Type).string_len(32).not_null())
                    .col(ColumnDef::new(BankAccounts::InitialBalance).double().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Spendings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Spendings::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Spendings::Title).text().not_null())
                    .col(ColumnDef::new(Spendings::Category).text().not_null())
                    .col(ColumnDef::new(Spendings::AmountUsd).double().null())
                    .col(ColumnDef::new(Spendings::AmountPkr).double().not_null())
                    .col(ColumnDef::new(Spendings::Date).date().not_null())
                    .col(
                        ColumnDef::new(Spendings::PaymentMethod)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Spendings::BankAccountId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_spendings_bank_account")
                            .from(Spendings::Table, Spendings::BankAccountId)
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
                    .name("idx_spendings_date")
                    .table(Spendings::Table)
                    .col(Spendings::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(Spendings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().if_exists().table(BankAccounts::Table).to_owned())
            .await?;
        Ok(())
    }
}
