//! Mapping of domain and repository errors onto HTTP responses.
//!
//! Every failure leaves the API as `{ "success": false, "message": "..." }`.
//! Server-side failures are logged and answered with `"Server error"`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use safar_core::{auth::PasswordError, export::ExportError};
use safar_db::repositories::{
    AdvanceError, AirCompError, CustomerError, PaymentError, TransferError, TreasuryError,
    UserError,
};
use safar_shared::{AppError, JwtError};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// Error returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// 400 with `message`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 401 with `message`.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// 403 with `message`.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self(AppError::Forbidden(message.into()))
    }

    /// 404 for a named resource.
    pub fn not_found(resource: &str) -> Self {
        Self(AppError::not_found(resource))
    }

    /// 500 with an internal description that is logged, never sent.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self(AppError::Internal(detail.to_string()))
    }

    /// HTTP status of this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!(error = %self.0, "Request failed");
        }

        let body = json!({
            "success": false,
            "message": self.0.public_message(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self::internal(err)
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort => Self::validation(err.to_string()),
            other => Self::internal(other),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        Self::internal(err)
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::EmailTaken => Self::validation("Email is Already Exist"),
            UserError::Database(e) => e.into(),
        }
    }
}

impl From<CustomerError> for ApiError {
    fn from(err: CustomerError) -> Self {
        match err {
            CustomerError::NotFound(_) => Self::not_found("Customer"),
            CustomerError::HasTransfers(_) => Self::validation(err.to_string()),
            CustomerError::Database(e) => e.into(),
        }
    }
}

impl From<AirCompError> for ApiError {
    fn from(err: AirCompError) -> Self {
        match err {
            AirCompError::NotFound(_) => Self::not_found("Air company"),
            AirCompError::Database(e) => e.into(),
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::NotFound(_) => Self::not_found("Transfer"),
            TransferError::Database(e) => e.into(),
            TransferError::CustomerNotFound(_)
            | TransferError::AirCompNotFound(_)
            | TransferError::DuplicateBookingNumber(_)
            | TransferError::NegativeCost
            | TransferError::HasPayments(_)
            | TransferError::Balance(_) => Self::validation(err.to_string()),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::NotFound(_) => Self::not_found("Payment"),
            PaymentError::Database(e) => e.into(),
            PaymentError::TransferNotFound(_) | PaymentError::Balance(_) => {
                Self::validation(err.to_string())
            }
        }
    }
}

impl From<TreasuryError> for ApiError {
    fn from(err: TreasuryError) -> Self {
        match err {
            TreasuryError::NotFound(_) => Self::not_found("Treasury entry"),
            TreasuryError::NonPositiveAmount => Self::validation(err.to_string()),
            TreasuryError::Database(e) => e.into(),
        }
    }
}

impl From<AdvanceError> for ApiError {
    fn from(err: AdvanceError) -> Self {
        match err {
            AdvanceError::NotFound(_) => Self::not_found("Advance"),
            AdvanceError::NonPositiveAmount => Self::validation(err.to_string()),
            AdvanceError::Database(e) => e.into(),
        }
    }
}
