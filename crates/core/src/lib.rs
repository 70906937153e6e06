//! Core business logic for Safar.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `auth` - Password hashing and user roles
//! - `dashboard` - Statistics folding for the dashboard
//! - `filter` - Day-bounded date filters from query strings
//! - `transfer` - Payment status derivation for bookings
//! - `export` - Spreadsheet export with Arabic headers

pub mod auth;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod transfer;
