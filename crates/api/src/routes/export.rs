//! Spreadsheet download responses.

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use safar_core::export::{Sheet, XLSX_CONTENT_TYPE};
use tracing::info;

use crate::error::ApiError;

/// Renders `sheet` and returns it as an `.xlsx` attachment.
///
/// # Errors
///
/// Returns a server error if the workbook cannot be written.
pub fn xlsx_response(sheet: &Sheet, filename: &str) -> Result<Response, ApiError> {
    let bytes = sheet.to_xlsx()?;
    info!(sheet = sheet.name(), rows = sheet.row_count() - 1, "Sheet exported");

    Ok((
        [
            (CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
