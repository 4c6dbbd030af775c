//! Cash-close report route.

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;

use backoffice_core::cash_close::CashCloseFilter;
use backoffice_db::CashCloseRepository;

use super::invoices::check_range;
use crate::{AppState, error::ApiError};

/// Creates the cash-close routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/cash-close", get(cash_close))
}

/// Query parameters for a cash-close run.
#[derive(Debug, Deserialize)]
pub struct CashCloseQuery {
    /// First day included (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Last day included (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Case-insensitive substring of the seller.
    pub seller: Option<String>,
    /// Payment method label.
    pub method: Option<String>,
}

impl From<CashCloseQuery> for CashCloseFilter {
    fn from(query: CashCloseQuery) -> Self {
        Self {
            date_from: query.from,
            date_to: query.to,
            seller: query.seller,
            method: query.method,
        }
    }
}

/// GET `/cash-close` - Totals by seller, method and day, plus movements.
async fn cash_close(
    State(state): State<AppState>,
    Query(query): Query<CashCloseQuery>,
) -> Result<impl IntoResponse, ApiError> {
    check_range(query.from, query.to)?;

    let repo = CashCloseRepository::new((*state.db).clone());
    Ok(Json(repo.cash_close(query.into()).await?))
}
