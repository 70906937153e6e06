//! Payment status derivation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payment state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing left to pay.
    Paid,
    /// Some, but not all, of the price has been paid.
    Partial,
    /// No payment recorded yet.
    Unpaid,
}

impl PaymentStatus {
    /// Derives the status from the sale price and the amount paid so far.
    #[must_use]
    pub fn derive(ticket_price: Decimal, total_paid: Decimal) -> Self {
        if ticket_price - total_paid <= Decimal::ZERO {
            Self::Paid
        } else if total_paid > Decimal::ZERO {
            Self::Partial
        } else {
            Self::Unpaid
        }
    }

    /// Returns the status as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "paid",
            Self::Partial => "partial",
            Self::Unpaid => "unpaid",
        }
    }

    /// Arabic label used in exports.
    #[must_use]
    pub const fn label_ar(&self) -> &'static str {
        match self {
            Self::Paid => "مدفوع",
            Self::Partial => "مدفوع جزئياً",
            Self::Unpaid => "غير مدفوع",
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "paid" => Ok(Self::Paid),
            "partial" => Ok(Self::Partial),
            "unpaid" => Ok(Self::Unpaid),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

/// Violations of the booking balance rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BalanceError {
    /// Sale price below zero.
    #[error("Ticket price cannot be negative")]
    NegativePrice,

    /// A payment of zero or less.
    #[error("Payment amount must be greater than zero")]
    NonPositivePayment,

    /// Payments would exceed the sale price.
    #[error("Payment exceeds remaining amount")]
    Overpaid {
        /// Amount that could still be paid.
        remaining: Decimal,
    },

    /// The price was lowered below what the customer already paid.
    #[error("Ticket price cannot be less than the amount already paid")]
    PriceBelowPaid,
}

/// Derived money fields of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    /// Sale price.
    pub ticket_price: Decimal,
    /// Sum of recorded payments.
    pub total_paid: Decimal,
    /// `ticket_price - total_paid`.
    pub remaining_amount: Decimal,
    /// Status consistent with the amounts.
    pub status: PaymentStatus,
}

impl Balance {
    /// Computes the balance for a price and the sum of its payments.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::NegativePrice` for a negative price and
    /// `BalanceError::PriceBelowPaid` when payments exceed the price.
    pub fn compute(ticket_price: Decimal, total_paid: Decimal) -> Result<Self, BalanceError> {
        if ticket_price < Decimal::ZERO {
            return Err(BalanceError::NegativePrice);
        }
        if total_paid > ticket_price {
            return Err(BalanceError::PriceBelowPaid);
        }

        Ok(Self {
            ticket_price,
            total_paid,
            remaining_amount: ticket_price - total_paid,
            status: PaymentStatus::derive(ticket_price, total_paid),
        })
    }

    /// Balance of a booking with no payments yet.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::NegativePrice` for a negative price.
    pub fn unpaid(ticket_price: Decimal) -> Result<Self, BalanceError> {
        Self::compute(ticket_price, Decimal::ZERO)
    }

    /// Applies one more payment on top of `paid_so_far`.
    ///
    /// # Errors
    ///
    /// Returns `BalanceError::NonPositivePayment` for amounts `<= 0` and
    /// `BalanceError::Overpaid` if the payment is larger than what remains.
    pub fn with_payment(
        ticket_price: Decimal,
        paid_so_far: Decimal,
        amount: Decimal,
    ) -> Result<Self, BalanceError> {
        if amount <= Decimal::ZERO {
            return Err(BalanceError::NonPositivePayment);
        }
        let remaining = ticket_price - paid_so_far;
        if amount > remaining {
            return Err(BalanceError::Overpaid {
                remaining: remaining.max(Decimal::ZERO),
            });
        }
        Self::compute(ticket_price, paid_so_far + amount)
    }

    /// Re-derives the balance after the price changed.
    ///
    /// # Errors
    ///
    /// Same as [`Balance::compute`].
    pub fn reprice(&self, ticket_price: Decimal) -> Result<Self, BalanceError> {
        Self::compute(ticket_price, self.total_paid)
    }
}
