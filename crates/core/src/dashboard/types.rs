//! Dashboard data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transfer::PaymentStatus;

/// Aggregates for all transfers sharing one payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusTotals {
    /// Status of the group.
    pub status: PaymentStatus,
    /// Number of transfers.
    pub count: u64,
    /// Sum of sale prices.
    pub sales: Decimal,
    /// Sum of ticket costs.
    pub cost: Decimal,
    /// Sum of recorded payments.
    pub paid: Decimal,
}

/// Booking figures for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferStats {
    /// Number of transfers.
    pub total: u64,
    /// Fully paid transfers.
    pub paid: u64,
    /// Partially paid transfers.
    pub partial: u64,
    /// Transfers with no payment.
    pub unpaid: u64,
    /// Sum of sale prices.
    pub total_sales: Decimal,
    /// Sum of ticket costs.
    pub total_cost: Decimal,
    /// `total_sales - total_cost`.
    pub total_profit: Decimal,
    /// Sum of payments received.
    pub total_paid: Decimal,
    /// `total_sales - total_paid`.
    pub total_remaining: Decimal,
}

impl TransferStats {
    /// Folds per-status groups into totals.
    ///
    /// A status may appear more than once; its groups are added together.
    #[must_use]
    pub fn from_groups(groups: impl IntoIterator<Item = StatusTotals>) -> Self {
        let mut stats = Self::default();
        for group in groups {
            stats.total += group.count;
            match group.status {
                PaymentStatus::Paid => stats.paid += group.count,
                PaymentStatus::Partial => stats.partial += group.count,
                PaymentStatus::Unpaid => stats.unpaid += group.count,
            }
            stats.total_sales += group.sales;
            stats.total_cost += group.cost;
            stats.total_paid += group.paid;
        }
        stats.total_profit = stats.total_sales - stats.total_cost;
        stats.total_remaining = stats.total_sales - stats.total_paid;
        stats
    }
}

/// Treasury cash-box totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryTotals {
    /// Sum of income entries.
    pub income: Decimal,
    /// Sum of expense entries.
    pub expense: Decimal,
    /// `income - expense`.
    pub balance: Decimal,
}

impl TreasuryTotals {
    /// Builds totals from the two sums.
    #[must_use]
    pub fn new(income: Decimal, expense: Decimal) -> Self {
        Self {
            income,
            expense,
            balance: income - expense,
        }
    }
}

/// Staff advances still owed to the agency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceTotals {
    /// Sum of outstanding advances.
    pub outstanding: Decimal,
    /// Number of outstanding advances.
    pub count_outstanding: u64,
}

/// Dashboard statistics response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Number of customers.
    pub customers: u64,
    /// Number of air companies.
    pub air_companies: u64,
    /// Booking figures.
    pub transfers: TransferStats,
    /// Cash-box figures.
    pub treasury: TreasuryTotals,
    /// Staff advance figures.
    pub advances: AdvanceTotals,
}
