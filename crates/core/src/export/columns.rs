//! Column layouts for exported sheets.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// MIME type of `.xlsx` workbooks.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Customer sheet: name, phone, email, national id, passport, nationality,
/// address, notes, created at.
pub const CUSTOMER_HEADERS: &[&str] = &[
    "الاسم",
    "الهاتف",
    "البريد الإلكتروني",
    "الرقم القومي",
    "رقم الجواز",
    "الجنسية",
    "العنوان",
    "ملاحظات",
    "تاريخ الإنشاء",
];

/// Transfer sheet: booking number, customer, air company, route, take-off,
/// cost, sale price, paid, remaining, status, created at.
pub const TRANSFER_HEADERS: &[&str] = &[
    "رقم الحجز",
    "العميل",
    "شركة الطيران",
    "خط السير",
    "تاريخ الإقلاع",
    "سعر التكلفة",
    "سعر البيع",
    "المدفوع",
    "المتبقي",
    "الحالة",
    "تاريخ الإنشاء",
];

/// Payment sheet: booking number, customer, amount, date, method, receipt,
/// notes.
pub const PAYMENT_HEADERS: &[&str] = &[
    "رقم الحجز",
    "العميل",
    "المبلغ",
    "تاريخ الدفع",
    "طريقة الدفع",
    "رقم الإيصال",
    "ملاحظات",
];

/// Formats an instant as `dd/mm/yyyy` in the agency timezone.
#[must_use]
pub fn format_date(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%d/%m/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date_uses_agency_day() {
        let instant = Utc.with_ymd_and_hms(2024, 2, 1, 22, 30, 0).unwrap();
        assert_eq!(format_date(instant, Tz::UTC), "01/02/2024");
        assert_eq!(format_date(instant, chrono_tz::Asia::Riyadh), "02/02/2024");
    }

    #[test]
    fn test_header_widths() {
        assert_eq!(CUSTOMER_HEADERS.len(), 9);
        assert_eq!(TRANSFER_HEADERS.len(), 11);
        assert_eq!(PAYMENT_HEADERS.len(), 7);
        assert_eq!(TRANSFER_HEADERS[0], "رقم الحجز");
    }
}
