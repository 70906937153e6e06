//! Dashboard statistics queries.

use rust_decimal::Decimal;
use safar_core::dashboard::{
    AdvanceTotals, DashboardStats, StatusTotals, TransferStats, TreasuryTotals,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QuerySelect, sea_query::Expr,
};

use super::filter::DateWindow;
use crate::entities::{
    advances, air_companies, customers,
    sea_orm_active_enums::{AdvanceStatus, TransferStatus, TreasuryEntryType},
    transfers, treasury_entries,
};

#[derive(Debug, FromQueryResult)]
struct StatusRow {
    status: TransferStatus,
    count: i64,
    sales: Option<Decimal>,
    cost: Option<Decimal>,
    paid: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct EntryTypeRow {
    entry_type: TreasuryEntryType,
    total: Option<Decimal>,
}

#[derive(Debug, FromQueryResult)]
struct OutstandingRow {
    total: Option<Decimal>,
    count: i64,
}

/// Read-only aggregate queries for the dashboard.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    db: DatabaseConnection,
}

impl StatsRepository {
    /// Creates a new statistics repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Collects all dashboard figures. `created` narrows the booking figures.
    ///
    /// # Errors
    ///
    /// Returns an error if any query fails.
    pub async fn dashboard(&self, created: Option<DateWindow>) -> Result<DashboardStats, DbErr> {
        let customers = customers::Entity::find().count(&self.db).await?;
        let air_companies = air_companies::Entity::find().count(&self.db).await?;

        Ok(DashboardStats {
            customers,
            air_companies,
            transfers: self.transfer_stats(created).await?,
            treasury: self.treasury_totals().await?,
            advances: self.advance_totals().await?,
        })
    }

    async fn transfer_stats(&self, created: Option<DateWindow>) -> Result<TransferStats, DbErr> {
        let mut query = transfers::Entity::find()
            .select_only()
            .column(transfers::Column::Status)
            .column_as(
                Expr::col((transfers::Entity, transfers::Column::Id)).count(),
                "count",
            )
            .column_as(
                Expr::col((transfers::Entity, transfers::Column::TicketPrice)).sum(),
                "sales",
            )
            .column_as(
                Expr::col((transfers::Entity, transfers::Column::TicketCost)).sum(),
                "cost",
            )
            .column_as(
                Expr::col((transfers::Entity, transfers::Column::TotalPaid)).sum(),
                "paid",
            )
            .group_by(transfers::Column::Status);
        if let Some(window) = created {
            query = query.filter(window.between(transfers::Column::CreatedAt));
        }

        let rows = query.into_model::<StatusRow>().all(&self.db).await?;

        Ok(TransferStats::from_groups(rows.into_iter().map(|row| {
            StatusTotals {
                status: row.status.into(),
                count: u64::try_from(row.count).unwrap_or(0),
                sales: row.sales.unwrap_or_default(),
                cost: row.cost.unwrap_or_default(),
                paid: row.paid.unwrap_or_default(),
            }
        })))
    }

    async fn treasury_totals(&self) -> Result<TreasuryTotals, DbErr> {
        let rows = treasury_entries::Entity::find()
            .select_only()
            .column(treasury_entries::Column::EntryType)
            .column_as(
                Expr::col((treasury_entries::Entity, treasury_entries::Column::Amount)).sum(),
                "total",
            )
            .group_by(treasury_entries::Column::EntryType)
            .into_model::<EntryTypeRow>()
            .all(&self.db)
            .await?;

        let (mut income, mut expense) = (Decimal::ZERO, Decimal::ZERO);
        for row in rows {
            let total = row.total.unwrap_or_default();
            match row.entry_type {
                TreasuryEntryType::Income => income += total,
                TreasuryEntryType::Expense => expense += total,
            }
        }
        Ok(TreasuryTotals::new(income, expense))
    }

    async fn advance_totals(&self) -> Result<AdvanceTotals, DbErr> {
        let row = advances::Entity::find()
            .select_only()
            .column_as(
                Expr::col((advances::Entity, advances::Column::Amount)).sum(),
                "total",
            )
            .column_as(
                Expr::col((advances::Entity, advances::Column::Id)).count(),
                "count",
            )
            .filter(advances::Column::Status.eq(AdvanceStatus::Outstanding))
            .into_model::<OutstandingRow>()
            .one(&self.db)
            .await?;

        Ok(row.map_or_else(AdvanceTotals::default, |row| AdvanceTotals {
            outstanding: row.total.unwrap_or_default(),
            count_outstanding: u64::try_from(row.count).unwrap_or(0),
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    use super::*;

    fn row(pairs: Vec<(&'static str, Value)>) -> BTreeMap<&'static str, Value> {
        pairs.into_iter().collect()
    }

    #[tokio::test]
    async fn test_dashboard_folds_groups() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row(vec![("num_items", Value::BigInt(Some(12)))])]])
            .append_query_results([vec![row(vec![("num_items", Value::BigInt(Some(3)))])]])
            .append_query_results([vec![
                row(vec![
                    ("status", Value::from("paid")),
                    ("count", Value::BigInt(Some(2))),
                    ("sales", Value::from(Some(dec!(2000)))),
                    ("cost", Value::from(Some(dec!(1700)))),
                    ("paid", Value::from(Some(dec!(2000)))),
                ]),
                row(vec![
                    ("status", Value::from("partial")),
                    ("count", Value::BigInt(Some(1))),
                    ("sales", Value::from(Some(dec!(1000)))),
                    ("cost", Value::from(Some(dec!(850)))),
                    ("paid", Value::from(Some(dec!(400)))),
                ]),
            ]])
            .append_query_results([vec![
                row(vec![
                    ("entry_type", Value::from("income")),
                    ("total", Value::from(Some(dec!(5000)))),
                ]),
                row(vec![
                    ("entry_type", Value::from("expense")),
                    ("total", Value::from(Some(dec!(1200)))),
                ]),
            ]])
            .append_query_results([vec![row(vec![
                ("total", Value::from(Option::<Decimal>::None)),
                ("count", Value::BigInt(Some(0))),
            ])]])
            .into_connection();

        let stats = StatsRepository::new(db).dashboard(None).await.unwrap();

        assert_eq!(stats.customers, 12);
        assert_eq!(stats.air_companies, 3);
        assert_eq!(stats.transfers.total, 3);
        assert_eq!(stats.transfers.paid, 2);
        assert_eq!(stats.transfers.partial, 1);
        assert_eq!(stats.transfers.unpaid, 0);
        assert_eq!(stats.transfers.total_profit, dec!(450));
        assert_eq!(stats.transfers.total_remaining, dec!(600));
        assert_eq!(stats.treasury.balance, dec!(3800));
        assert_eq!(stats.advances.outstanding, Decimal::ZERO);
        assert_eq!(stats.advances.count_outstanding, 0);
    }
}
