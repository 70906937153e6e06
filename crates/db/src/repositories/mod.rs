//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod advance;
pub mod air_comp;
mod balance;
pub mod customer;
pub mod filter;
pub mod payment;
pub mod stats;
pub mod transfer;
pub mod treasury;
pub mod user;

pub use advance::{
    AdvanceError, AdvanceFilter, AdvanceRepository, CreateAdvanceInput, UpdateAdvanceInput,
};
pub use air_comp::{AirCompError, AirCompFilter, AirCompInput, AirCompRepository};
pub use customer::{
    CreateCustomerInput, CustomerError, CustomerFilter, CustomerRepository, UpdateCustomerInput,
};
pub use filter::DateWindow;
pub use payment::{
    CreatePaymentInput, PaymentError, PaymentFilter, PaymentRepository, PaymentView,
    TransferRef, UpdatePaymentInput,
};
pub use stats::StatsRepository;
pub use transfer::{
    AirCompRef, CreateTransferInput, CustomerRef, TransferError, TransferFilter,
    TransferRepository, TransferView, UpdateTransferInput,
};
pub use treasury::{TreasuryError, TreasuryFilter, TreasuryInput, TreasuryRepository};
pub use user::{CreateUserInput, UserError, UserRepository, normalize_email};
