//! Payment routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use safar_core::export::{Cell, PAYMENT_HEADERS, Sheet, format_date};
use safar_db::{
    entities::sea_orm_active_enums::PaymentMethod,
    repositories::{CreatePaymentInput, PaymentFilter, PaymentRepository, UpdatePaymentInput},
};
use safar_shared::{PageRequest, PageResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{blank_to_none, export::xlsx_response};
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiQuery, blank_as_none, day_window},
    middleware::AuthUser,
    response::{DataResponse, MessageResponse},
};

/// Creates the payment routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route("/payments/export/excel", get(export_payments))
        .route(
            "/payments/{id}",
            get(get_payment).put(update_payment).delete(delete_payment),
        )
}

/// Query parameters for listing payments.
#[derive(Debug, Default, Deserialize)]
pub struct PaymentQuery {
    /// Transfer ID.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub transfer: Option<Uuid>,
    /// `cash`, `bank_transfer`, `card` or `other`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub method: Option<PaymentMethod>,
    /// Payment day, `dd/mm/yyyy` or ISO.
    pub payment_date: Option<String>,
    /// Creation day, `dd/mm/yyyy` or ISO.
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl PaymentQuery {
    fn into_filter(self, state: &AppState) -> PaymentFilter {
        PaymentFilter {
            payment_date: day_window(self.payment_date.as_deref(), state.timezone),
            created: day_window(self.created_at.as_deref(), state.timezone),
            transfer: self.transfer,
            method: self.method,
        }
    }
}

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Booking being paid.
    pub transfer_id: Uuid,
    /// Amount received.
    pub amount: Decimal,
    /// When the money was received (RFC 3339). Defaults to now.
    pub payment_date: Option<DateTime<FixedOffset>>,
    /// How it was paid. Defaults to cash.
    pub method: Option<PaymentMethod>,
    /// Receipt reference.
    pub receipt_number: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating a payment.
#[derive(Debug, Deserialize)]
pub struct UpdatePaymentRequest {
    /// Amount received.
    pub amount: Option<Decimal>,
    /// When the money was received (RFC 3339).
    pub payment_date: Option<DateTime<FixedOffset>>,
    /// How it was paid.
    pub method: Option<PaymentMethod>,
    /// Receipt reference; blank clears it.
    pub receipt_number: Option<String>,
    /// Free-form notes; blank clears them.
    pub notes: Option<String>,
}

/// GET /payments
async fn list_payments(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(query): ApiQuery<PaymentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page.normalized();
    let filter = query.into_filter(&state);

    let (items, total) = PaymentRepository::new((*state.db).clone())
        .list(&filter, page)
        .await?;

    Ok(Json(PageResponse::new(items, page, total)))
}

/// GET /payments/{id}
async fn get_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let payment = PaymentRepository::new((*state.db).clone())
        .find_view(id)
        .await?;
    Ok(Json(DataResponse::new(payment)))
}

/// POST /payments - records a payment and updates the booking balance.
async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = CreatePaymentInput {
        transfer_id: payload.transfer_id,
        amount: payload.amount,
        payment_date: payload
            .payment_date
            .unwrap_or_else(|| Utc::now().fixed_offset()),
        method: payload.method.unwrap_or(PaymentMethod::Cash),
        receipt_number: blank_to_none(payload.receipt_number),
        notes: blank_to_none(payload.notes),
    };

    let repo = PaymentRepository::new((*state.db).clone());
    let payment = repo.create(input, auth.user_id()).await?;
    let view = repo.find_view(payment.id).await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(view))))
}

/// PUT /payments/{id}
async fn update_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = UpdatePaymentInput {
        amount: payload.amount,
        payment_date: payload.payment_date,
        method: payload.method,
        receipt_number: payload.receipt_number.map(|s| blank_to_none(Some(s))),
        notes: payload.notes.map(|s| blank_to_none(Some(s))),
    };

    let repo = PaymentRepository::new((*state.db).clone());
    repo.update(id, input, auth.user_id()).await?;
    let view = repo.find_view(id).await?;

    info!(payment_id = %id, user_id = %auth.user_id(), "Payment updated");
    Ok(Json(DataResponse::new(view)))
}

/// DELETE /payments/{id} - admin only.
async fn delete_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    PaymentRepository::new((*state.db).clone())
        .delete(id, auth.user_id())
        .await?;

    Ok(Json(MessageResponse::new("Payment deleted")))
}

/// GET /payments/export/excel
async fn export_payments(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PaymentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let tz = state.timezone;
    let filter = query.into_filter(&state);
    let payments = PaymentRepository::new((*state.db).clone())
        .list_all(&filter)
        .await?;

    let mut sheet = Sheet::new("المدفوعات", PAYMENT_HEADERS);
    for view in payments {
        let p = view.payment;
        let (booking_number, customer_name) = view
            .transfer
            .map_or((None, None), |t| (Some(t.booking_number), t.customer_name));
        sheet.push_row(vec![
            Cell::opt_text(booking_number),
            Cell::opt_text(customer_name),
            p.amount.into(),
            format_date(p.payment_date.with_timezone(&Utc), tz).into(),
            p.method.label_ar().into(),
            Cell::opt_text(p.receipt_number),
            Cell::opt_text(p.notes),
        ])?;
    }

    xlsx_response(&sheet, "payments.xlsx")
}
