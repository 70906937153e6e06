//! Export error types.

use thiserror::Error;

/// Errors raised while building or rendering a sheet.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A data row does not match the header width.
    #[error("row has {actual} cells, expected {expected}")]
    RowWidth {
        /// Number of header columns.
        expected: usize,
        /// Number of cells in the offending row.
        actual: usize,
    },

    /// The sheet exceeds the worksheet row or column limits.
    #[error("sheet too large for a worksheet")]
    TooLarge,

    /// A decimal could not be represented as a spreadsheet number.
    #[error("amount {0} cannot be written as a number")]
    Number(String),

    /// The spreadsheet writer failed.
    #[error("xlsx writer failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
