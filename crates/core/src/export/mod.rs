//! Spreadsheet export.
//!
//! List results are copied into a [`Sheet`] with a fixed column layout and
//! Arabic headers, then rendered to `.xlsx` bytes.

mod columns;
mod error;
mod sheet;

pub use columns::{
    CUSTOMER_HEADERS, PAYMENT_HEADERS, TRANSFER_HEADERS, XLSX_CONTENT_TYPE, format_date,
};
pub use error::ExportError;
pub use sheet::{Cell, Sheet};
