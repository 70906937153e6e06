//! Dashboard statistics.
//!
//! The database does the counting and summing; this module folds the grouped
//! rows into the response shape.

mod types;

pub use types::{AdvanceTotals, DashboardStats, StatusTotals, TransferStats, TreasuryTotals};
