//! Credit account listings.

pub mod service;
pub mod types;

pub use service::AccountsService;
pub use types::*;
