//! `SeaORM` entity definitions.

pub mod advances;
pub mod air_companies;
pub mod customers;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod transfers;
pub mod treasury_entries;
pub mod users;
