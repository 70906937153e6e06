//! In-memory sheet and its `.xlsx` rendering.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};

use super::error::ExportError;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// Text, written as a string cell.
    Text(String),
    /// Money, written as a number cell with two decimals.
    Number(Decimal),
    /// Blank cell.
    Empty,
}

impl Cell {
    /// Text cell, or blank for `None`.
    #[must_use]
    pub fn opt_text(value: Option<impl Into<String>>) -> Self {
        value.map_or(Self::Empty, |v| Self::Text(v.into()))
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Decimal> for Cell {
    fn from(value: Decimal) -> Self {
        Self::Number(value)
    }
}

/// One worksheet: a header row followed by data rows of the same width.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    headers: &'static [&'static str],
    rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Creates an empty sheet with a fixed header row.
    #[must_use]
    pub fn new(name: impl Into<String>, headers: &'static [&'static str]) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a data row.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::RowWidth` if the row does not match the headers.
    pub fn push_row(&mut self, row: Vec<Cell>) -> Result<(), ExportError> {
        if row.len() != self.headers.len() {
            return Err(ExportError::RowWidth {
                expected: self.headers.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Worksheet name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Header labels in column order.
    #[must_use]
    pub const fn headers(&self) -> &'static [&'static str] {
        self.headers
    }

    /// Data rows (without the header).
    #[must_use]
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of rows written, header included.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Renders the sheet to `.xlsx` bytes.
    ///
    /// The worksheet is right-to-left with a bold header row.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be written or the workbook cannot
    /// be serialized.
    pub fn to_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let money_format = Format::new().set_num_format("#,##0.00");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.name)?;
        worksheet.set_right_to_left(true);

        for (col, header) in self.headers.iter().enumerate() {
            let col = u16::try_from(col).map_err(|_| ExportError::TooLarge)?;
            worksheet.write_string_with_format(0, col, *header, &header_format)?;
            worksheet.set_column_width(col, 18)?;
        }

        for (index, row) in self.rows.iter().enumerate() {
            let row_num = u32::try_from(index + 1).map_err(|_| ExportError::TooLarge)?;
            for (col, cell) in row.iter().enumerate() {
                let col = u16::try_from(col).map_err(|_| ExportError::TooLarge)?;
                match cell {
                    Cell::Text(text) => {
                        worksheet.write_string(row_num, col, text)?;
                    }
                    Cell::Number(amount) => {
                        let value = amount
                            .to_f64()
                            .ok_or_else(|| ExportError::Number(amount.to_string()))?;
                        worksheet.write_number_with_format(row_num, col, value, &money_format)?;
                    }
                    Cell::Empty => {}
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{CUSTOMER_HEADERS, TRANSFER_HEADERS};
    use rust_decimal_macros::dec;

    fn transfer_row(booking: &str) -> Vec<Cell> {
        vec![
            booking.into(),
            "أحمد علي".into(),
            "Saudia".into(),
            "CAI-JED".into(),
            "01/03/2024".into(),
            dec!(800).into(),
            dec!(1000).into(),
            dec!(400).into(),
            dec!(600).into(),
            "مدفوع جزئياً".into(),
            "01/02/2024".into(),
        ]
    }

    #[test]
    fn test_one_header_row_plus_one_row_per_record() {
        let mut sheet = Sheet::new("Transfers", TRANSFER_HEADERS);
        for booking in ["BK-1", "BK-2", "BK-3"] {
            sheet.push_row(transfer_row(booking)).unwrap();
        }

        assert_eq!(sheet.row_count(), 4);
        assert_eq!(sheet.headers(), TRANSFER_HEADERS);
        assert_eq!(sheet.rows()[2][0], Cell::Text("BK-3".into()));
    }

    #[test]
    fn test_empty_sheet_has_only_headers() {
        let sheet = Sheet::new("Customers", CUSTOMER_HEADERS);
        assert_eq!(sheet.row_count(), 1);
        assert!(sheet.rows().is_empty());
    }

    #[test]
    fn test_row_width_is_checked() {
        let mut sheet = Sheet::new("Customers", CUSTOMER_HEADERS);
        let err = sheet.push_row(vec!["only one".into()]).unwrap_err();
        assert!(matches!(
            err,
            ExportError::RowWidth {
                expected: 9,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_renders_xlsx_archive() {
        let mut sheet = Sheet::new("Transfers", TRANSFER_HEADERS);
        sheet.push_row(transfer_row("BK-1")).unwrap();

        let bytes = sheet.to_xlsx().unwrap();
        // xlsx is a zip container
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_opt_text() {
        assert_eq!(Cell::opt_text(None::<String>), Cell::Empty);
        assert_eq!(Cell::opt_text(Some("x")), Cell::Text("x".into()));
    }
}
