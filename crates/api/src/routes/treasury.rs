//! Treasury (cash-box) routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, FixedOffset, Utc};
use rust_decimal::Decimal;
use safar_db::{
    entities::sea_orm_active_enums::TreasuryEntryType,
    repositories::{TreasuryFilter, TreasuryInput, TreasuryRepository},
};
use safar_shared::{PageRequest, PageResponse};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use super::blank_to_none;
use crate::{
    AppState,
    error::ApiError,
    extractors::{ApiQuery, ValidatedJson, blank_as_none, day_window},
    middleware::AuthUser,
    response::{DataResponse, MessageResponse},
};

/// Creates the treasury routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/treasury", get(list_entries).post(create_entry))
        .route(
            "/treasury/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

/// Query parameters for listing treasury entries.
#[derive(Debug, Default, Deserialize)]
pub struct TreasuryQuery {
    /// `income` or `expense`.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub entry_type: Option<TreasuryEntryType>,
    /// Entry day, `dd/mm/yyyy` or ISO.
    pub entry_date: Option<String>,
}

/// Request body for creating or replacing a treasury entry.
#[derive(Debug, Deserialize, Validate)]
pub struct TreasuryRequest {
    /// `income` or `expense`.
    pub entry_type: TreasuryEntryType,
    /// Positive amount.
    pub amount: Decimal,
    /// Entry date (RFC 3339). Defaults to now.
    pub entry_date: Option<DateTime<FixedOffset>>,
    /// What the money was for.
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    /// External reference, e.g. an invoice number.
    pub reference: Option<String>,
}

impl TreasuryRequest {
    fn into_input(self) -> Result<TreasuryInput, ApiError> {
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(ApiError::validation("Description is required"));
        }
        Ok(TreasuryInput {
            entry_type: self.entry_type,
            amount: self.amount,
            entry_date: self
                .entry_date
                .unwrap_or_else(|| Utc::now().fixed_offset()),
            description,
            reference: blank_to_none(self.reference),
        })
    }
}

/// GET /treasury
async fn list_entries(
    State(state): State<AppState>,
    ApiQuery(page): ApiQuery<PageRequest>,
    ApiQuery(query): ApiQuery<TreasuryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let page = page.normalized();
    let filter = TreasuryFilter {
        entry_type: query.entry_type,
        entry_date: day_window(query.entry_date.as_deref(), state.timezone),
    };

    let (items, total) = TreasuryRepository::new((*state.db).clone())
        .list(&filter, page)
        .await?;

    Ok(Json(PageResponse::new(items, page, total)))
}

/// GET /treasury/{id}
async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = TreasuryRepository::new((*state.db).clone())
        .find_by_id(id)
        .await?;
    Ok(Json(DataResponse::new(entry)))
}

/// POST /treasury
async fn create_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(payload): ValidatedJson<TreasuryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = TreasuryRepository::new((*state.db).clone())
        .create(payload.into_input()?, auth.user_id())
        .await?;

    info!(
        entry_id = %entry.id,
        entry_type = ?entry.entry_type,
        amount = %entry.amount,
        user_id = %auth.user_id(),
        "Treasury entry recorded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse::new(entry))))
}

/// PUT /treasury/{id}
async fn update_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<TreasuryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let entry = TreasuryRepository::new((*state.db).clone())
        .update(id, payload.into_input()?)
        .await?;

    info!(entry_id = %id, user_id = %auth.user_id(), "Treasury entry updated");
    Ok(Json(DataResponse::new(entry)))
}

/// DELETE /treasury/{id} - admin only.
async fn delete_entry(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    auth.require_admin()?;

    TreasuryRepository::new((*state.db).clone())
        .delete(id)
        .await?;

    info!(entry_id = %id, user_id = %auth.user_id(), "Treasury entry deleted");
    Ok(Json(MessageResponse::new("Treasury entry deleted")))
}
