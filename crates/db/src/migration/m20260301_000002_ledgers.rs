//! Treasury and staff advance ledgers.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_initial::{Users, money, timestamp};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TreasuryEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TreasuryEntries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TreasuryEntries::EntryType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(money(TreasuryEntries::Amount))
                    .col(
                        ColumnDef::new(TreasuryEntries::EntryDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TreasuryEntries::Description).text().not_null())
                    .col(ColumnDef::new(TreasuryEntries::Reference).string_len(64).null())
                    .col(ColumnDef::new(TreasuryEntries::CreatedBy).uuid().null())
                    .col(timestamp(TreasuryEntries::CreatedAt))
                    .col(timestamp(TreasuryEntries::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_treasury_entries_created_by")
                            .from(TreasuryEntries::Table, TreasuryEntries::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Advances::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Advances::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Advances::EmployeeName).string_len(255).not_null())
                    .col(money(Advances::Amount))
                    .col(
                        ColumnDef::new(Advances::AdvanceDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Advances::Status)
                            .string_len(16)
                            .not_null()
                            .default("outstanding"),
                    )
                    .col(ColumnDef::new(Advances::Notes).text().null())
                    .col(ColumnDef::new(Advances::CreatedBy).uuid().null())
                    .col(timestamp(Advances::CreatedAt))
                    .col(timestamp(Advances::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_advances_created_by")
                            .from(Advances::Table, Advances::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Advances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TreasuryEntries::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum TreasuryEntries {
    Table,
    Id,
    EntryType,
    Amount,
    EntryDate,
    Description,
    Reference,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Advances {
    Table,
    Id,
    EmployeeName,
    Amount,
    AdvanceDate,
    Status,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
