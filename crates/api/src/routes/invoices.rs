//! Invoice routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_core::credit::{CreditState, DeliveryState, InvoiceBalance, PaymentMethodRef};
use backoffice_db::{
    InvoiceRepository,
    entities::invoices,
    repositories::{CreateInvoiceInput, InvoiceFilter, InvoiceView},
};
use backoffice_shared::{
    AppError,
    types::{PageMeta, PageRequest},
};

use super::payment_methods::method_ref;
use crate::{AppState, error::ApiError};

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route("/invoices/{id}", get(get_invoice).delete(delete_invoice))
        .route("/invoices/{id}/delivery-state", patch(update_delivery_state))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesQuery {
    /// Case-insensitive substring of the seller.
    pub seller: Option<String>,
    /// First issue date (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Last issue date (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Customer DNI.
    pub dni: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Page size (default: 20, max: 100).
    pub per_page: Option<u32>,
}

/// Request body for creating an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Invoice number.
    pub invoice_number: String,
    /// Issue date (YYYY-MM-DD).
    pub issued_on: NaiveDate,
    /// Seller name.
    pub seller: String,
    /// Customer DNI.
    pub customer_dni: String,
    /// Customer name.
    pub customer_name: String,
    /// Amount before interest.
    pub total: Decimal,
    /// Amount owed, interest included. Defaults to `total`.
    pub total_with_interest: Option<Decimal>,
    /// Number of installments.
    #[serde(default)]
    pub installment_count: i32,
    /// Fixed installment amount.
    pub installment_amount: Option<Decimal>,
    /// Catalog payment method.
    pub payment_method_id: Option<Uuid>,
    /// Free-text payment method.
    pub payment_method: Option<String>,
}

/// Request body for updating the delivery state.
#[derive(Debug, Deserialize)]
pub struct DeliveryStateRequest {
    /// `pending`, `accepted` (or `delivered`), or `rejected`.
    pub state: String,
}

/// Response for an invoice.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Invoice number.
    pub invoice_number: String,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Seller name.
    pub seller: String,
    /// Customer DNI.
    pub customer_dni: String,
    /// Customer name.
    pub customer_name: String,
    /// Amount before interest.
    pub total: Decimal,
    /// Amount owed, interest included.
    pub total_with_interest: Decimal,
    /// Number of installments.
    pub installment_count: i32,
    /// Fixed installment amount.
    pub installment_amount: Option<Decimal>,
    /// Payment method reference.
    pub payment_method: PaymentMethodRef,
    /// Normalized method label.
    pub payment_method_label: String,
    /// Credit state.
    pub credit_state: CreditState,
    /// Delivery state.
    pub delivery_state: DeliveryState,
    /// Balance from the stored payments.
    pub balance: InvoiceBalance,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<InvoiceView> for InvoiceResponse {
    fn from(view: InvoiceView) -> Self {
        let payment_method = view.invoice.method_ref();
        let invoice = view.invoice;
        Self {
            id: invoice.id,
            invoice_number: invoice.invoice_number,
            issued_on: invoice.issued_on,
            seller: invoice.seller,
            customer_dni: invoice.customer_dni,
            customer_name: invoice.customer_name,
            total: invoice.total,
            total_with_interest: invoice.total_with_interest,
            installment_count: invoice.installment_count,
            installment_amount: invoice.installment_amount,
            payment_method,
            payment_method_label: view.method_label,
            credit_state: invoice.credit_state.into(),
            delivery_state: invoice.delivery_state.into(),
            balance: view.balance,
            created_at: invoice.created_at,
        }
    }
}

/// Response for a page of invoices.
#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    /// Invoices on this page.
    pub invoices: Vec<InvoiceResponse>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Response after a delivery state update.
#[derive(Debug, Serialize)]
pub struct DeliveryStateResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// New delivery state.
    pub delivery_state: DeliveryState,
}

impl From<invoices::Model> for DeliveryStateResponse {
    fn from(model: invoices::Model) -> Self {
        Self {
            id: model.id,
            delivery_state: model.delivery_state.into(),
        }
    }
}

/// Rejects a range whose start lies after its end.
pub(crate) fn check_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<(), AppError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(AppError::Validation(format!(
            "Date range start {from} is after its end {to}"
        ))),
        _ => Ok(()),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/invoices` - List invoices with filters.
async fn list_invoices(
    State(state): State<AppState>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    check_range(query.from, query.to)?;

    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    let filter = InvoiceFilter {
        seller: query.seller,
        date_from: query.from,
        date_to: query.to,
        customer_dni: query.dni,
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let result = repo.list_invoices(filter, page).await?;

    Ok(Json(InvoiceListResponse {
        invoices: result.data.into_iter().map(InvoiceResponse::from).collect(),
        meta: result.meta,
    }))
}

/// POST `/invoices` - Create an invoice.
async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let payment_method = method_ref(payload.payment_method_id, payload.payment_method)?;

    let input = CreateInvoiceInput {
        invoice_number: payload.invoice_number,
        issued_on: payload.issued_on,
        seller: payload.seller,
        customer_dni: payload.customer_dni,
        customer_name: payload.customer_name,
        total: payload.total,
        total_with_interest: payload.total_with_interest.unwrap_or(payload.total),
        installment_count: payload.installment_count,
        installment_amount: payload.installment_amount,
        payment_method,
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let view = repo.create_invoice(input).await?;
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(view))))
}

/// GET `/invoices/{id}` - Get an invoice with its balance.
async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    let view = repo.get_invoice(id).await?;
    Ok(Json(InvoiceResponse::from(view)))
}

/// DELETE `/invoices/{id}` - Delete an invoice and its payments.
async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvoiceRepository::new((*state.db).clone());
    repo.delete_invoice(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH `/invoices/{id}/delivery-state` - Update the delivery state.
async fn update_delivery_state(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeliveryStateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let delivery_state: DeliveryState = payload.state.parse()?;

    let repo = InvoiceRepository::new((*state.db).clone());
    let invoice = repo.update_delivery_state(id, delivery_state).await?;
    Ok(Json(DeliveryStateResponse::from(invoice)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range() {
        let early = NaiveDate::from_ymd_opt(2026, 1, 1);
        let late = NaiveDate::from_ymd_opt(2026, 2, 1);
        assert!(check_range(early, late).is_ok());
        assert!(check_range(None, late).is_ok());
        assert!(matches!(
            check_range(late, early),
            Err(AppError::Validation(_))
        ));
    }
}
