//! Credit account listing routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;

use backoffice_core::accounts::{OutstandingFilter, PortfolioFilter};
use backoffice_db::AccountsRepository;

use super::invoices::check_range;
use crate::{AppState, error::ApiError};

/// Creates the credit account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/credit-accounts/outstanding", get(outstanding_accounts))
        .route("/credit-accounts/portfolio", get(credit_portfolio))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the outstanding accounts listing.
#[derive(Debug, Deserialize)]
pub struct OutstandingQuery {
    /// Exact customer DNI.
    pub dni: Option<String>,
    /// Exact issue date (YYYY-MM-DD).
    pub issued_on: Option<NaiveDate>,
}

/// Query parameters for the portfolio listing.
#[derive(Debug, Deserialize)]
pub struct PortfolioQuery {
    /// Case-insensitive substring of the customer name.
    pub customer_name: Option<String>,
    /// First issue date (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Last issue date (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/credit-accounts/outstanding` - Credit accounts with money owed.
async fn outstanding_accounts(
    State(state): State<AppState>,
    Query(query): Query<OutstandingQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = OutstandingFilter {
        dni: query.dni,
        issued_on: query.issued_on,
    };

    let repo = AccountsRepository::new((*state.db).clone());
    Ok(Json(repo.outstanding_accounts(filter).await?))
}

/// GET `/credit-accounts/portfolio` - Credit accounts split into paid and pending.
async fn credit_portfolio(
    State(state): State<AppState>,
    Query(query): Query<PortfolioQuery>,
) -> Result<impl IntoResponse, ApiError> {
    check_range(query.from, query.to)?;

    let filter = PortfolioFilter {
        customer_name: query.customer_name,
        date_from: query.from,
        date_to: query.to,
    };

    let repo = AccountsRepository::new((*state.db).clone());
    Ok(Json(repo.credit_portfolio(filter).await?))
}
