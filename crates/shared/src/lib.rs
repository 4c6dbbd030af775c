//! Shared types, errors, and configuration for the back office.
//!
//! This crate provides common types used across all other crates:
//! - Money rounding helpers over `rust_decimal`
//! - Typed IDs for invoices, payments and payment methods
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
