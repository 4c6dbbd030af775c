//! Cash-close aggregation.
//!
//! Groups the invoices of a period by seller, payment method and day, and
//! adds the money collected on credit accounts in the same period.

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::CashCloseService;
pub use types::*;
