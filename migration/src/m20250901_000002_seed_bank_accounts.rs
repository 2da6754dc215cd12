use crate::m20250901_000001_initial::BankAccounts;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let insert = Query::insert()
            .into_table(BankAccounts::Table)
            .columns([
                BankAccounts::Title,
                BankAccounts::Type,
                BankAccounts::InitialBalance,
            ])
            .values_panic(["Habib Metro".into(), "Payroll".into(), Option::<f64>::None.into()])
            .values_panic(["Meezan Bank".into(), "Primary".into(), 1000.0f64.into()])
            .values_panic(["HBL".into(), "Secondary".into(), Option::<f64>::None.into()])
            .on_conflict(OnConflict::column(BankAccounts::Title).do_nothing().to_owned())
            .to_owned();
        manager.exec_stmt(insert).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(BankAccounts::Table)
            .and_where(
                Expr::col(BankAccounts::Title).is_in(["Habib Metro", "Meezan Bank", "HBL"]),
            )
            .to_owned();
        manager.exec_stmt(delete).await?;
        Ok(())
    }
}
