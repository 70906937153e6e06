//! Initial database migration.
//!
//! Creates users, customers, air companies, transfers and payments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ============================================================
        // PART 1: USERS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(16)
                            .not_null()
                            .default("employee"),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(timestamp(Users::CreatedAt))
                    .col(timestamp(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 2: CUSTOMERS & AIR COMPANIES
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Customers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Customers::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Customers::Phone).string_len(32).not_null())
                    .col(ColumnDef::new(Customers::Email).string_len(255).null())
                    .col(ColumnDef::new(Customers::NationalId).string_len(32).null())
                    .col(ColumnDef::new(Customers::PassportNumber).string_len(32).null())
                    .col(ColumnDef::new(Customers::Nationality).string_len(64).null())
                    .col(ColumnDef::new(Customers::Address).text().null())
                    .col(ColumnDef::new(Customers::Notes).text().null())
                    .col(ColumnDef::new(Customers::CreatedBy).uuid().null())
                    .col(ColumnDef::new(Customers::UpdatedBy).uuid().null())
                    .col(timestamp(Customers::CreatedAt))
                    .col(timestamp(Customers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customers_created_by")
                            .from(Customers::Table, Customers::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customers_updated_by")
                            .from(Customers::Table, Customers::UpdatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_customers_name")
                    .table(Customers::Table)
                    .col(Customers::Name)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AirCompanies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AirCompanies::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AirCompanies::Name).string_len(255).not_null())
                    .col(ColumnDef::new(AirCompanies::Phone).string_len(32).null())
                    .col(ColumnDef::new(AirCompanies::Address).text().null())
                    .col(timestamp(AirCompanies::CreatedAt))
                    .col(timestamp(AirCompanies::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 3: TRANSFERS (TICKET BOOKINGS)
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Transfers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Transfers::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Transfers::BookingNumber)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Transfers::CustomerId).uuid().not_null())
                    .col(ColumnDef::new(Transfers::AirCompId).uuid().null())
                    .col(ColumnDef::new(Transfers::Route).string_len(255).null())
                    .col(ColumnDef::new(Transfers::Airport).string_len(255).null())
                    .col(ColumnDef::new(Transfers::Country).string_len(128).null())
                    .col(
                        ColumnDef::new(Transfers::TakeOffDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(money(Transfers::TicketCost))
                    .col(money(Transfers::TicketPrice))
                    .col(
                        ColumnDef::new(Transfers::Status)
                            .string_len(16)
                            .not_null()
                            .default("unpaid"),
                    )
                    .col(money(Transfers::TotalPaid))
                    .col(money(Transfers::RemainingAmount))
                    .col(ColumnDef::new(Transfers::Notes).text().null())
                    .col(ColumnDef::new(Transfers::CreatedBy).uuid().null())
                    .col(ColumnDef::new(Transfers::UpdatedBy).uuid().null())
                    .col(timestamp(Transfers::CreatedAt))
                    .col(timestamp(Transfers::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_customer")
                            .from(Transfers::Table, Transfers::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_air_comp")
                            .from(Transfers::Table, Transfers::AirCompId)
                            .to(AirCompanies::Table, AirCompanies::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_created_by")
                            .from(Transfers::Table, Transfers::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transfers_updated_by")
                            .from(Transfers::Table, Transfers::UpdatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transfers_customer")
                    .table(Transfers::Table)
                    .col(Transfers::CustomerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_transfers_status")
                    .table(Transfers::Table)
                    .col(Transfers::Status)
                    .to_owned(),
            )
            .await?;

        // ============================================================
        // PART 4: PAYMENTS
        // ============================================================
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Payments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Payments::TransferId).uuid().not_null())
                    .col(money(Payments::Amount))
                    .col(
                        ColumnDef::new(Payments::PaymentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Payments::Method)
                            .string_len(16)
                            .not_null()
                            .default("cash"),
                    )
                    .col(ColumnDef::new(Payments::ReceiptNumber).string_len(64).null())
                    .col(ColumnDef::new(Payments::Notes).text().null())
                    .col(ColumnDef::new(Payments::CreatedBy).uuid().null())
                    .col(timestamp(Payments::CreatedAt))
                    .col(timestamp(Payments::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_transfer")
                            .from(Payments::Table, Payments::TransferId)
                            .to(Transfers::Table, Transfers::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_payments_created_by")
                            .from(Payments::Table, Payments::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_transfer")
                    .table(Payments::Table)
                    .col(Payments::TransferId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transfers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AirCompanies::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// `NUMERIC(14, 2) NOT NULL DEFAULT 0`.
pub(super) fn money<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .decimal_len(14, 2)
        .not_null()
        .default(0)
        .to_owned()
}

/// `TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP`.
pub(super) fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
pub(super) enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Role,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
    Phone,
    Email,
    NationalId,
    PassportNumber,
    Nationality,
    Address,
    Notes,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AirCompanies {
    Table,
    Id,
    Name,
    Phone,
    Address,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Transfers {
    Table,
    Id,
    BookingNumber,
    CustomerId,
    AirCompId,
    Route,
    Airport,
    Country,
    TakeOffDate,
    TicketCost,
    TicketPrice,
    Status,
    TotalPaid,
    RemainingAmount,
    Notes,
    CreatedBy,
    UpdatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    TransferId,
    Amount,
    PaymentDate,
    Method,
    ReceiptNumber,
    Notes,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}
