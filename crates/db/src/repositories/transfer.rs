//! Transfer (ticket booking) repository.
//!
//! `status`, `total_paid` and `remaining_amount` are written only from a
//! [`Balance`] so they always agree with the sale price and the payments.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use safar_core::transfer::{Balance, BalanceError};
use safar_shared::PageRequest;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use serde::Serialize;
use uuid::Uuid;

use super::{
    balance::{apply_balance, lock_transfer, paid_sum},
    filter::{DateWindow, contains_ci},
};
use crate::entities::{
    air_companies, customers, payments, sea_orm_active_enums::TransferStatus, transfers,
};

/// Error types for transfer operations.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// Transfer not found.
    #[error("Transfer not found")]
    NotFound(Uuid),

    /// Referenced customer does not exist.
    #[error("Customer not found")]
    CustomerNotFound(Uuid),

    /// Referenced air company does not exist.
    #[error("Air company not found")]
    AirCompNotFound(Uuid),

    /// Booking number already used.
    #[error("Booking number '{0}' already exists")]
    DuplicateBookingNumber(String),

    /// Ticket cost below zero.
    #[error("Ticket cost cannot be negative")]
    NegativeCost,

    /// Transfer still has payments.
    #[error("Cannot delete transfer with {0} recorded payments")]
    HasPayments(u64),

    /// Price change violates the balance rules.
    #[error(transparent)]
    Balance(#[from] BalanceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing transfers.
#[derive(Debug, Clone, Default)]
pub struct TransferFilter {
    /// Substring of the booking number.
    pub booking_number: Option<String>,
    /// Owning customer.
    pub customer: Option<Uuid>,
    /// Issuing air company.
    pub air_comp: Option<Uuid>,
    /// Payment status.
    pub status: Option<TransferStatus>,
    /// Day of departure.
    pub take_off: Option<DateWindow>,
    /// Day the record was created.
    pub created: Option<DateWindow>,
}

/// Input for creating a transfer.
#[derive(Debug, Clone)]
pub struct CreateTransferInput {
    /// Agency booking reference.
    pub booking_number: String,
    /// Traveller.
    pub customer_id: Uuid,
    /// Issuing air company.
    pub air_comp_id: Option<Uuid>,
    /// Itinerary, e.g. `CAI-JED-CAI`.
    pub route: Option<String>,
    /// Departure airport.
    pub airport: Option<String>,
    /// Destination country.
    pub country: Option<String>,
    /// Departure time.
    pub take_off_date: Option<DateTime<FixedOffset>>,
    /// What the agency pays for the ticket.
    pub ticket_cost: Decimal,
    /// What the customer is charged.
    pub ticket_price: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for updating a transfer. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransferInput {
    /// Agency booking reference.
    pub booking_number: Option<String>,
    /// Traveller.
    pub customer_id: Option<Uuid>,
    /// Issuing air company.
    pub air_comp_id: Option<Option<Uuid>>,
    /// Itinerary.
    pub route: Option<Option<String>>,
    /// Departure airport.
    pub airport: Option<Option<String>>,
    /// Destination country.
    pub country: Option<Option<String>>,
    /// Departure time.
    pub take_off_date: Option<Option<DateTime<FixedOffset>>>,
    /// What the agency pays for the ticket.
    pub ticket_cost: Option<Decimal>,
    /// What the customer is charged.
    pub ticket_price: Option<Decimal>,
    /// Free-form notes.
    pub notes: Option<Option<String>>,
}

/// Customer fields shown next to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerRef {
    /// Customer ID.
    pub id: Uuid,
    /// Customer name.
    pub name: String,
    /// Customer phone.
    pub phone: String,
}

/// Air company fields shown next to a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AirCompRef {
    /// Air company ID.
    pub id: Uuid,
    /// Air company name.
    pub name: String,
}

/// A transfer with its referenced records attached.
#[derive(Debug, Clone, Serialize)]
pub struct TransferView {
    /// The booking.
    #[serde(flatten)]
    pub transfer: transfers::Model,
    /// Owning customer, if it still exists.
    pub customer: Option<CustomerRef>,
    /// Issuing air company, if any.
    pub air_comp: Option<AirCompRef>,
}

/// Transfer repository.
#[derive(Debug, Clone)]
pub struct TransferRepository {
    db: DatabaseConnection,
}

impl TransferRepository {
    /// Creates a new transfer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists one page of transfers, newest first, with references attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        filter: &TransferFilter,
        page: PageRequest,
    ) -> Result<(Vec<TransferView>, u64), TransferError> {
        let query = filtered(filter);
        let total = query.clone().count(&self.db).await?;

        let items = query
            .order_by_desc(transfers::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((self.attach(items).await?, total))
    }

    /// Lists every matching transfer, for exports.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self, filter: &TransferFilter) -> Result<Vec<TransferView>, TransferError> {
        let items = filtered(filter)
            .order_by_desc(transfers::Column::CreatedAt)
            .all(&self.db)
            .await?;
        self.attach(items).await
    }

    /// Finds a transfer by ID.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotFound` if no such transfer exists.
    pub async fn find_by_id(&self, id: Uuid) -> Result<transfers::Model, TransferError> {
        transfers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(TransferError::NotFound(id))
    }

    /// Finds a transfer by ID with references attached.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotFound` if no such transfer exists.
    pub async fn find_view(&self, id: Uuid) -> Result<TransferView, TransferError> {
        let transfer = self.find_by_id(id).await?;
        let mut views = self.attach(vec![transfer]).await?;
        views.pop().ok_or(TransferError::NotFound(id))
    }

    /// Creates an unpaid transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if a reference is missing, the booking number is
    /// taken or an amount is negative.
    pub async fn create(
        &self,
        input: CreateTransferInput,
        user_id: Uuid,
    ) -> Result<TransferView, TransferError> {
        if input.ticket_cost < Decimal::ZERO {
            return Err(TransferError::NegativeCost);
        }
        let balance = Balance::unpaid(input.ticket_price)?;

        self.ensure_customer(input.customer_id).await?;
        if let Some(air_comp_id) = input.air_comp_id {
            self.ensure_air_comp(air_comp_id).await?;
        }
        self.ensure_booking_number_free(&input.booking_number, None)
            .await?;

        let now = chrono::Utc::now().into();
        let transfer = transfers::ActiveModel {
            id: Set(Uuid::new_v4()),
            booking_number: Set(input.booking_number),
            customer_id: Set(input.customer_id),
            air_comp_id: Set(input.air_comp_id),
            route: Set(input.route),
            airport: Set(input.airport),
            country: Set(input.country),
            take_off_date: Set(input.take_off_date),
            ticket_cost: Set(input.ticket_cost),
            ticket_price: Set(balance.ticket_price),
            status: Set(balance.status.into()),
            total_paid: Set(balance.total_paid),
            remaining_amount: Set(balance.remaining_amount),
            notes: Set(input.notes),
            created_by: Set(Some(user_id)),
            updated_by: Set(Some(user_id)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let transfer = transfer.insert(&self.db).await?;
        self.find_view(transfer.id).await
    }

    /// Applies a partial update.
    ///
    /// The row is locked and the payments re-summed inside one transaction,
    /// so the stored balance always matches the price being written.
    ///
    /// # Errors
    ///
    /// Returns an error if the transfer or a new reference is missing, the
    /// new booking number is taken, or the new price is below what was paid.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateTransferInput,
        user_id: Uuid,
    ) -> Result<TransferView, TransferError> {
        self.find_by_id(id).await?;

        if let Some(booking_number) = &input.booking_number {
            self.ensure_booking_number_free(booking_number, Some(id))
                .await?;
        }
        if let Some(customer_id) = input.customer_id {
            self.ensure_customer(customer_id).await?;
        }
        if let Some(Some(air_comp_id)) = input.air_comp_id {
            self.ensure_air_comp(air_comp_id).await?;
        }
        if input.ticket_cost.is_some_and(|cost| cost < Decimal::ZERO) {
            return Err(TransferError::NegativeCost);
        }

        let txn = self.db.begin().await?;
        let transfer = lock_transfer(&txn, id)
            .await?
            .ok_or(TransferError::NotFound(id))?;
        let paid = paid_sum(&txn, id, None).await?;
        let price = input.ticket_price.unwrap_or(transfer.ticket_price);
        let balance = Balance::compute(price, paid)?;

        let mut active: transfers::ActiveModel = transfer.into();
        apply_balance(&mut active, balance);
        if let Some(booking_number) = input.booking_number {
            active.booking_number = Set(booking_number);
        }
        if let Some(customer_id) = input.customer_id {
            active.customer_id = Set(customer_id);
        }
        if let Some(air_comp_id) = input.air_comp_id {
            active.air_comp_id = Set(air_comp_id);
        }
        if let Some(route) = input.route {
            active.route = Set(route);
        }
        if let Some(airport) = input.airport {
            active.airport = Set(airport);
        }
        if let Some(country) = input.country {
            active.country = Set(country);
        }
        if let Some(take_off_date) = input.take_off_date {
            active.take_off_date = Set(take_off_date);
        }
        if let Some(ticket_cost) = input.ticket_cost {
            active.ticket_cost = Set(ticket_cost);
        }
        if let Some(notes) = input.notes {
            active.notes = Set(notes);
        }
        active.updated_by = Set(Some(user_id));
        active.updated_at = Set(chrono::Utc::now().into());

        let transfer = active.update(&txn).await?;
        txn.commit().await?;

        self.find_view(transfer.id).await
    }

    /// Deletes a transfer that has no payments.
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NotFound` if no such transfer exists and
    /// `TransferError::HasPayments` if payments still reference it.
    pub async fn delete(&self, id: Uuid) -> Result<(), TransferError> {
        self.find_by_id(id).await?;

        let payments = payments::Entity::find()
            .filter(payments::Column::TransferId.eq(id))
            .count(&self.db)
            .await?;
        if payments > 0 {
            return Err(TransferError::HasPayments(payments));
        }

        transfers::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn ensure_customer(&self, id: Uuid) -> Result<(), TransferError> {
        customers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(TransferError::CustomerNotFound(id))
    }

    async fn ensure_air_comp(&self, id: Uuid) -> Result<(), TransferError> {
        air_companies::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(TransferError::AirCompNotFound(id))
    }

    async fn ensure_booking_number_free(
        &self,
        booking_number: &str,
        except: Option<Uuid>,
    ) -> Result<(), TransferError> {
        let mut query =
            transfers::Entity::find().filter(transfers::Column::BookingNumber.eq(booking_number));
        if let Some(id) = except {
            query = query.filter(transfers::Column::Id.ne(id));
        }

        if query.count(&self.db).await? > 0 {
            return Err(TransferError::DuplicateBookingNumber(
                booking_number.to_string(),
            ));
        }
        Ok(())
    }

    /// Loads the customers and air companies of `items` in two queries.
    async fn attach(
        &self,
        items: Vec<transfers::Model>,
    ) -> Result<Vec<TransferView>, TransferError> {
        let customer_ids: Vec<Uuid> = items.iter().map(|t| t.customer_id).collect();
        let air_comp_ids: Vec<Uuid> = items.iter().filter_map(|t| t.air_comp_id).collect();

        let customers: HashMap<Uuid, CustomerRef> = if customer_ids.is_empty() {
            HashMap::new()
        } else {
            customers::Entity::find()
                .filter(customers::Column::Id.is_in(customer_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|c| {
                    (
                        c.id,
                        CustomerRef {
                            id: c.id,
                            name: c.name,
                            phone: c.phone,
                        },
                    )
                })
                .collect()
        };

        let air_comps: HashMap<Uuid, AirCompRef> = if air_comp_ids.is_empty() {
            HashMap::new()
        } else {
            air_companies::Entity::find()
                .filter(air_companies::Column::Id.is_in(air_comp_ids))
                .all(&self.db)
                .await?
                .into_iter()
                .map(|a| (a.id, AirCompRef { id: a.id, name: a.name }))
                .collect()
        };

        Ok(items
            .into_iter()
            .map(|transfer| TransferView {
                customer: customers.get(&transfer.customer_id).cloned(),
                air_comp: transfer
                    .air_comp_id
                    .and_then(|id| air_comps.get(&id).cloned()),
                transfer,
            })
            .collect())
    }
}

fn filtered(filter: &TransferFilter) -> Select<transfers::Entity> {
    let mut query = transfers::Entity::find();

    if let Some(number) = filter
        .booking_number
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        query = query.filter(contains_ci(transfers::Column::BookingNumber, number));
    }
    if let Some(customer) = filter.customer {
        query = query.filter(transfers::Column::CustomerId.eq(customer));
    }
    if let Some(air_comp) = filter.air_comp {
        query = query.filter(transfers::Column::AirCompId.eq(air_comp));
    }
    if let Some(status) = filter.status {
        query = query.filter(transfers::Column::Status.eq(status));
    }
    if let Some(window) = filter.take_off {
        query = query.filter(window.between(transfers::Column::TakeOffDate));
    }
    if let Some(window) = filter.created {
        query = query.filter(window.between(transfers::Column::CreatedAt));
    }

    query
}
