//! Payment repository.
//!
//! Every write re-sums the booking's payments and stores the derived balance
//! on the transfer in the same database transaction.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use safar_core::transfer::{Balance, BalanceError};
use safar_shared::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::{
    balance::{lock_transfer, paid_sum, store_balance},
    filter::DateWindow,
};
use crate::entities::{customers, payments, sea_orm_active_enums::PaymentMethod, transfers};

/// Error types for payment operations.
#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    /// Payment not found.
    #[error("Payment not found")]
    NotFound(Uuid),

    /// Referenced transfer does not exist.
    #[error("Transfer not found")]
    TransferNotFound(Uuid),

    /// Amount violates the balance rules.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing payments.
#[derive(Debug, Clone, Default)]
pub struct PaymentFilter {
    /// Booking the payments belong to.
    pub transfer: Option<Uuid>,
    /// Payment method.
    pub method: Option<PaymentMethod>,
    /// Day the money was received.
    pub payment_date: Option<DateWindow>,
    /// Day the record was created.
    pub created: Option<DateWindow>,
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct CreatePaymentInput {
    /// Booking being paid.
    pub transfer_id: Uuid,
    /// Amount received.
    pub amount: Decimal,
    /// When the money was received.
    pub payment_date: DateTime<FixedOffset>,
    /// How it was paid.
    pub method: PaymentMethod,
    /// Receipt reference.
    pub receipt_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating a payment. The booking cannot be changed.
#[derive(Debug, Clone, Default)]
pub struct UpdatePaymentInput {
    /// Amount received.
    pub amount: Option<Decimal>,
    /// When the money was received.
    pub payment_date: Option<DateTime<FixedOffset>>,
    /// How it was paid.
    pub method: Option<PaymentMethod>,
    /// Receipt reference.
    pub receipt_number: Option<Option<String>>,
    /// Free-form notes.
    pub notes: Option<Option<String>>,
}

/// Booking fields shown next to a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRef {
    /// Transfer ID.
    pub id: Uuid,
    /// Agency booking reference.
    pub booking_number: String,
    /// Name of the booking's customer.
    pub customer_name: Option<String>,
}

/// A payment with its booking attached.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentView {
    /// The payment.
    #[serde(flatten)]
    pub payment: payments::Model,
    /// The booking, if it still exists.
    pub transfer: Option<TransferRef>,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: DatabaseConnection,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists one page of payments, newest first, with bookings attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &PaymentFilter,
        page: PageRequest,
    ) -> Result<(Vec<PaymentView>, u64), PaymentError> {
        let query = filtered(filter);
        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(payments::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((self.attach(items).await?, total))
    }

    /// Lists every matching payment, for exports.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self, filter: &PaymentFilter) -> Result<Vec<PaymentView>, PaymentError> {
        let items = filtered(filter)
            .order_by_desc(payments::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.attach(items).await
    }

    /// Finds a payment by ID with its booking attached.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NotFound` if no such payment exists.
    pub async fn find_view(&self, id: Uuid) -> Result<PaymentView, PaymentError> {
        let payment = payments::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(PaymentError::NotFound(id))?;
        let mut views = self.attach(vec![payment]).await?;
        views.pop().ok_or(PaymentError::NotFound(id))
    }

    /// Records a payment and updates the booking's balance.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::TransferNotFound` for an unknown booking and
    /// `PaymentError::Balance` for a non-positive amount or an overpayment.
    pub async fn create(
        &self,
        input: CreatePaymentInput,
        user_id: Uuid,
    ) -> Result<payments::Model, PaymentError> {
        let txn = self.db.begin().await?;

        let transfer = lock_transfer(&txn, input.transfer_id)
            .await?
            .ok_or(PaymentError::TransferNotFound(input.transfer_id))?;
        let paid = paid_sum(&txn, transfer.id, None).await?;
        let balance = Balance::with_payment(transfer.ticket_price, paid, input.amount)?;

        let now = chrono::Utc::now().into();
        let payment = payments::ActiveModel {
            id: Set(Uuid::new_v4()),
            transfer_id: Set(transfer.id),
            amount: Set(input.amount),
            payment_date: Set(input.payment_date),
            method: Set(input.method),
            receipt_number: Set(input.receipt_number),
            notes: Set(input.notes),
            created_by: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        store_balance(&txn, transfer, balance, user_id).await?;
        txn.commit().await?;

        info!(
            payment_id = %payment.id,
            transfer_id = %payment.transfer_id,
            amount = %payment.amount,
            "Payment recorded"
        );
        Ok(payment)
    }

    /// Updates a payment and re-derives the booking's balance.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NotFound` for an unknown payment and
    /// `PaymentError::Balance` if the new amount is invalid.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdatePaymentInput,
        user_id: Uuid,
    ) -> Result<payments::Model, PaymentError> {
        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(PaymentError::NotFound(id))?;
        let transfer = lock_transfer(&txn, payment.transfer_id)
            .await?
            .ok_or(PaymentError::TransferNotFound(payment.transfer_id))?;

        let amount = input.amount.unwrap_or(payment.amount);
        let others = paid_sum(&txn, transfer.id, Some(id)).await?;
        let balance = Balance::with_payment(transfer.ticket_price, others, amount)?;

        let mut active: payments::ActiveModel = payment.into();
        active.amount = Set(amount);
        if let Some(payment_date) = input.payment_date {
            active.payment_date = Set(payment_date);
        }
        if let Some(method) = input.method {
            active.method = Set(method);
        }
        if let Some(receipt_number) = input.receipt_number {
            active.receipt_number = Set(receipt_number);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_at = Set(chrono::Utc::now().into());
        let payment = active.update(&txn).await?;

        store_balance(&txn, transfer, balance, user_id).await?;
        txn.commit().await?;

        Ok(payment)
    }

    /// Deletes a payment and re-derives the booking's balance.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::NotFound` for an unknown payment.
    pub async fn delete(&self, id: Uuid, user_id: Uuid) -> Result<(), PaymentError> {
        let txn = self.db.begin().await?;

        let payment = payments::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(PaymentError::NotFound(id))?;
        let transfer = lock_transfer(&txn, payment.transfer_id)
            .await?
            .ok_or(PaymentError::TransferNotFound(payment.transfer_id))?;

        let others = paid_sum(&txn, transfer.id, Some(id)).await?;
        let balance = Balance::compute(transfer.ticket_price, others)?;

        payments::Entity::delete_by_id(id).exec(&txn).await?;
        store_balance(&txn, transfer, balance, user_id).await?;
        txn.commit().await?;

        info!(payment_id = %id, "Payment deleted");
        Ok(())
    }

    /// Loads the bookings (and their customer names) of `items`.
    async fn attach(&self, items: Vec<payments::Model>) -> Result<Vec<PaymentView>, PaymentError> {
        let transfer_ids: Vec<Uuid> = items.iter().map(|p| p.transfer_id).collect();
        if transfer_ids.is_empty() {
            return Ok(Vec::new());
        }

        let refs: std::collections::HashMap<Uuid, TransferRef> = transfers::Entity::find()
            .filter(transfers::Column::Id.is_in(transfer_ids))
            .find_also_related(customers::Entity)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|(t, c)| {
                (
                    t.id,
                    TransferRef {
                        id: t.id,
                        booking_number: t.booking_number,
                        customer_name: c.map(|c| c.name),
                    },
                )
            })
            .collect();

        Ok(items
            .into_iter()
            .map(|payment| PaymentView {
                transfer: refs.get(&payment.transfer_id).cloned(),
                payment,
            })
            .collect())
    }
}

fn filtered(filter: &PaymentFilter) -> Select<payments::Entity> {
    let mut query = payments::Entity::find();

    if let Some(transfer) = filter.transfer {
        query = query.filter(payments::Column::TransferId.eq(transfer));
    }
    if let Some(method) = filter.method {
        query = query.filter(payments::Column::Method.eq(method));
    }
    if let Some(window) = filter.payment_date {
        query = query.filter(window.between(payments::Column::PaymentDate));
    }
    if let Some(window) = filter.created {
        query = query.filter(window.between(payments::Column::CreatedAt));
    }

    query
}

#[cfg(test)]
#[path = "payment_tests.rs"]
mod tests;
