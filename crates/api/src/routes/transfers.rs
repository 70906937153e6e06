//! Transfer (ticket booking) routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use safar_core::{
    export::{Cell, Sheet, TRANSFER_HEADERS, format_date},
    transfer::PaymentStatus,
};
use safar_db::{
    entities::sea_orm_active_enums::TransferStatus,
    repositories::{
        CreateTransferInput, PaymentFilter, PaymentRepository, TransferFilter, TransferRepository,
        UpdateTransferInput,
    },
};
use safar_shared::{PageRequest, PageResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::{blank_to_none, export::xlsx_response};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiQuery, ValidatedJson, blank_as_none, day_window, nullable},
    middleware::AuthUser,
    response::{DataResponse, MessageResponse},
};

/// Creates the transfer routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transfers", get(list_transfers).post(create_transfer))
        .route("/transfers/export/excel", get(export_transfers))
        .route(
            "/transfers/{id}",
            get(get_transfer).put(update_transfer).delete(delete_transfer),
        )
        .route("/transfers/{id}/payments", get(list_transfer_payments))
}

/// Query parameters for listing transfers.
#[derive(Debug, Default, Deserialize)]
pub struct TransferQuery {
    /// Substring of the booking number.
    pub booking_number: Option<String>,
    /// Customer ID.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub customer: Option<Uuid>,
    /// Air company ID.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub air_comp: Option<Uuid>,
    /// `paid`, `partial` or `unpaid`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub status: Option<TransferStatus>,
    /// Departure day, `dd/mm/yyyy` or ISO.
    pub take_off_date: Option<String>,
    /// Creation day, `dd/mm/yyyy` or ISO.
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl TransferQuery {
    fn into_filter(self, state: &AppState) -> TransferFilter {
        TransferFilter {
            take_off: day_window(self.take_off_date.as_deref(), state.timezone),
            created: day_window(self.created_at.as_deref(), state.timezone),
            booking_number: self.booking_number,
            customer: self.customer,
            air_comp: self.air_comp,
            status: self.status,
        }
    }
}

/// Request body for creating a transfer.
///
/// Payment status and totals are derived and cannot be supplied.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransferRequest {
    /// Agency booking reference.
    #[validate(length(min = 1, message = "Booking number is required"))]
    pub booking_number: String,
    /// Traveller.
    pub customer_id: Uuid,
    /// Issuing air company.
    pub air_comp_id: Option<Uuid>,
    /// Itinerary.
    pub route: Option<String>,
    /// Departure airport.
    pub airport: Option<String>,
    /// Destination country.
    pub country: Option<String>,
    /// Departure time (RFC 3339).
    pub take_off_date: Option<DateTime<FixedOffset>>,
    /// What the agency pays.
    #[serde(default)]
    pub ticket_cost: Decimal,
    /// What the customer is charged.
    pub ticket_price: Decimal,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating a transfer.
///
/// Blank strings clear optional text fields; `null` clears the air company
/// and the departure time.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTransferRequest {
    /// Agency booking reference.
    #[validate(length(min = 1, message = "Booking number is required"))]
    pub booking_number: Option<String>,
    /// Traveller.
    pub customer_id: Option<Uuid>,
    /// Issuing air company.
    #[serde(default, deserialize_with = "nullable")]
    pub air_comp_id: Option<Option<Uuid>>,
    /// Itinerary.
    pub route: Option<String>,
    /// Departure airport.
    pub airport: Option<String>,
    /// Destination country.
    pub country: Option<String>,
    /// Departure time (RFC 3339).
    #[serde(default, deserialize_with = "nullable")]
    pub take_off_date: Option<Option<DateTime<FixedOffset>>>,
    /// What the agency pays.
    pub ticket_cost: Option<Decimal>,
    /// What the customer is charged.
    pub ticket_price: Option<Decimal>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// GET /transfers
async fn list_transfers(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(query): ApiQuery<TransferQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page.normalized();
    let filter = query.into_filter(&state);

    let (items, total) = TransferRepository::new((*state.db).clone())
        .list(&filter, page)
        .await?;

    Ok(Json(PageResponse::new(items, page, total)))
}

/// GET /transfers/{id}
async fn get_transfer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let transfer = TransferRepository::new((*state.db).clone())
        .find_view(id)
        .await?;
    Ok(Json(DataResponse::new(transfer)))
}

/// POST /transfers
async fn create_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<CreateTransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreateTransferInput {
        booking_number: payload.booking_number.trim().to_string(),
        customer_id: payload.customer_id,
        air_comp_id: payload.air_comp_id,
        route: blank_to_none(payload.route),
        airport: blank_to_none(payload.airport),
        country: blank_to_none(payload.country),
        take_off_date: payload.take_off_date,
        ticket_cost: payload.ticket_cost,
        ticket_price: payload.ticket_price,
        notes: blank_to_none(payload.notes),
    };

    let transfer = TransferRepository::new((*state.db).clone())
        .create(input, auth.user_id())
        .await?;

    info!(
        transfer_id = %transfer.transfer.id,
        booking_number = %transfer.transfer.booking_number,
        user_id = %auth.user_id(),
        "Transfer created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(transfer))))
}

/// PUT /transfers/{id}
async fn update_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateTransferRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = UpdateTransferInput {
        booking_number: payload.booking_number.map(|s| s.trim().to_string()),
        customer_id: payload.customer_id,
        air_comp_id: payload.air_comp_id,
        route: payload.route.map(|s| blank_to_none(Some(s))),
        airport: payload.airport.map(|s| blank_to_none(Some(s))),
        country: payload.country.map(|s| blank_to_none(Some(s))),
        take_off_date: payload.take_off_date,
        ticket_cost: payload.ticket_cost,
        ticket_price: payload.ticket_price,
        notes: payload.notes.map(|s| blank_to_none(Some(s))),
    };

    let transfer = TransferRepository::new((*state.db).clone())
        .update(id, input, auth.user_id())
        .await?;

    info!(transfer_id = %id, user_id = %auth.user_id(), "Transfer updated");
    Ok(Json(DataResponse::new(transfer)))
}

/// DELETE /transfers/{id} - admin only.
async fn delete_transfer(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    TransferRepository::new((*state.db).clone())
        .delete(id)
        .await?;

    info!(transfer_id = %id, user_id = %auth.user_id(), "Transfer deleted");
    Ok(Json(MessageResponse::new("Transfer deleted")))
}

/// GET /transfers/{id}/payments
async fn list_transfer_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page.normalized();
    TransferRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;

    let filter = PaymentFilter {
        transfer: Some(id),
        ..Default::default()
    };
    let (items, total) = PaymentRepository::new((*state.db).clone())
        .list(&filter, page)
        .await?;

    Ok(Json(PageResponse::new(items, page, total)))
}

/// GET /transfers/export/excel
async fn export_transfers(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<TransferQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tz = state.timezone;
    let filter = query.into_filter(&state);
    let transfers = TransferRepository::new((*state.db).clone())
        .list_all(&filter)
        .await?;

    let mut sheet = Sheet::new("الحجوزات", TRANSFER_HEADERS);
    for view in transfers {
        let t = view.transfer;
        let status: PaymentStatus = t.status.into();
        sheet.push_row(vec![
            t.booking_number.into(),
            Cell::opt_text(view.customer.map(|c| c.name)),
            Cell::opt_text(view.air_comp.map(|a| a.name)),
            Cell::opt_text(t.route),
            Cell::opt_text(t.take_off_date.map(|d| format_date(d.with_timezone(&Utc), tz))),
            t.ticket_cost.into(),
            t.ticket_price.into(),
            t.total_paid.into(),
            t.remaining_amount.into(),
            status.label_ar().into(),
            format_date(t.created_at.with_timezone(&Utc), tz).into(),
        ])?;
    }

    xlsx_response(&sheet, "transfers.xlsx")
}
