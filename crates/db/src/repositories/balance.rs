//! Transaction helpers that keep a booking's stored balance in step with its
//! payments. Payment writes and price changes both go through here.

use rust_decimal::Decimal;
use safar_core::transfer::Balance;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, DbBackend, DbErr,
    EntityTrait, FromQueryResult, QueryFilter, QuerySelect, Set, sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::{payments, transfers};

#[derive(Debug, FromQueryResult)]
struct PaidSum {
    total: Option<Decimal>,
}

/// Loads a transfer inside `txn`, locking its row where the backend can.
pub(crate) async fn lock_transfer(
    txn: &DatabaseTransaction,
    id: Uuid,
) -> Result<Option<transfers::Model>, DbErr> {
    let mut query = transfers::Entity::find_by_id(id);
    if txn.get_database_backend() == DbBackend::Postgres {
        query = query.lock_exclusive();
    }
    query.one(txn).await
}

/// Sums a booking's payments, optionally leaving one out.
pub(crate) async fn paid_sum(
    txn: &DatabaseTransaction,
    transfer_id: Uuid,
    excluding: Option<Uuid>,
) -> Result<Decimal, DbErr> {
    let mut query = payments::Entity::find()
        .select_only()
        .column_as(
            Expr::col((payments::Entity, payments::Column::Amount)).sum(),
            "total",
        )
        .filter(payments::Column::TransferId.eq(transfer_id));
    if let Some(id) = excluding {
        query = query.filter(payments::Column::Id.ne(id));
    }

    let sum = query.into_model::<PaidSum>().one(txn).await?;
    Ok(sum.and_then(|s| s.total).unwrap_or(Decimal::ZERO))
}

/// Copies all four balance fields onto `active`.
pub(crate) fn apply_balance(active: &mut transfers::ActiveModel, balance: Balance) {
    active.ticket_price = Set(balance.ticket_price);
    active.total_paid = Set(balance.total_paid);
    active.remaining_amount = Set(balance.remaining_amount);
    active.status = Set(balance.status.into());
}

/// Writes `balance` onto the locked transfer.
pub(crate) async fn store_balance(
    txn: &DatabaseTransaction,
    transfer: transfers::Model,
    balance: Balance,
    user_id: Uuid,
) -> Result<transfers::Model, DbErr> {
    let mut active: transfers::ActiveModel = transfer.into();
    apply_balance(&mut active, balance);
    active.updated_by = Set(Some(user_id));
    active.updated_at = Set(chrono::Utc::now().into());

    active.update(txn).await
}
