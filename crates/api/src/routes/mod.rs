//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod cash_close;
pub mod health;
pub mod invoices;
pub mod payment_methods;
pub mod payments;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(payment_methods::routes())
        .merge(invoices::routes())
        .merge(payments::routes())
        .merge(accounts::routes())
        .merge(cash_close::routes())
}
