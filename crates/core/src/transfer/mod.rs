//! Booking (transfer) rules.
//!
//! A transfer's `status`, `total_paid` and `remaining_amount` are never taken
//! from the client. They are derived from the sale price and the payments
//! recorded against the booking.

mod balance;


pub use balance::{Balance, BalanceError, PaymentStatus};
