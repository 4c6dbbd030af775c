//! Core business logic for the back office.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `credit` - Payments against credit-account invoices
//! - `cash_close` - Cash-close aggregation by seller, method and day
//! - `accounts` - Outstanding credit account listings

pub mod accounts;
pub mod cash_close;
pub mod credit;
