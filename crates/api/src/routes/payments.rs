//! Credit payment routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_core::credit::{
    CreditError, CreditService, InvoiceBalance, PaymentKind, PaymentMethodRef, RecordPaymentInput,
};
use backoffice_db::{
    CreditRepository,
    repositories::{PaymentView, RecordedPayment},
};

use super::payment_methods::method_ref;
use crate::{AppState, error::ApiError};

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices/{id}/balance", get(invoice_balance))
        .route("/invoices/{id}/payments", get(list_payments).post(record_payment))
        .route("/payments/{id}", delete(delete_payment))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for recording a payment.
#[derive(Debug, Deserialize)]
pub struct RecordPaymentRequest {
    /// `installment` or `lump_sum`.
    pub kind: String,
    /// Installments paid, for `installment`.
    pub installments: Option<Decimal>,
    /// Money paid, for `lump_sum`.
    pub amount: Option<Decimal>,
    /// Catalog payment method.
    pub payment_method_id: Option<Uuid>,
    /// Free-text payment method.
    pub payment_method: Option<String>,
    /// Posting date (YYYY-MM-DD). Defaults to today.
    pub posted_on: Option<NaiveDate>,
    /// Description. A default is generated when absent.
    pub description: Option<String>,
    /// Receipt image reference.
    pub receipt_ref: Option<String>,
}

impl RecordPaymentRequest {
    /// Validates the shape of the request and builds the ledger input.
    fn into_input(self) -> Result<RecordPaymentInput, ApiError> {
        let kind: PaymentKind = self
            .kind
            .parse()
            .map_err(|message: String| ApiError::bad_request("INVALID_PAYMENT_KIND", message))?;

        let quantity = match kind {
            PaymentKind::Installment => self
                .installments
                .ok_or(CreditError::NonPositiveInstallmentCount)?,
            PaymentKind::LumpSum => self.amount.ok_or(CreditError::NonPositiveAmount)?,
        };
        CreditService::validate_quantity(kind, quantity)?;

        let method = method_ref(self.payment_method_id, self.payment_method)?
            .ok_or_else(|| CreditError::InvalidMethod("payment method is required".to_string()))?;

        Ok(RecordPaymentInput {
            kind,
            quantity,
            method,
            posted_on: self.posted_on.unwrap_or_else(|| Utc::now().date_naive()),
            description: self.description,
            receipt_ref: self.receipt_ref,
        })
    }
}

/// Response for a payment.
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// Payment ID.
    pub id: Uuid,
    /// Invoice ID.
    pub invoice_id: Uuid,
    /// Money paid as installments.
    pub installment_amount_paid: Decimal,
    /// Money paid on account.
    pub extra_payment_amount: Decimal,
    /// Installments covered by this payment.
    pub installment_count_paid: Decimal,
    /// Installments covered so far.
    pub installment_count_cumulative: Decimal,
    /// Installments still owed.
    pub installment_count_remaining: Decimal,
    /// Posting date.
    pub posted_on: NaiveDate,
    /// Description.
    pub description: String,
    /// Payment method reference.
    pub payment_method: Option<PaymentMethodRef>,
    /// Normalized method label.
    pub payment_method_label: String,
    /// Receipt image reference.
    pub receipt_ref: Option<String>,
    /// Created at timestamp.
    pub created_at: DateTime<FixedOffset>,
}

impl From<PaymentView> for PaymentResponse {
    fn from(view: PaymentView) -> Self {
        let payment_method = view.payment.method_ref();
        let payment = view.payment;
        Self {
            id: payment.id,
            invoice_id: payment.invoice_id,
            installment_amount_paid: payment.installment_amount_paid,
            extra_payment_amount: payment.extra_payment_amount,
            installment_count_paid: payment.installment_count_paid,
            installment_count_cumulative: payment.installment_count_cumulative,
            installment_count_remaining: payment.installment_count_remaining,
            posted_on: payment.posted_on,
            description: payment.description,
            payment_method,
            payment_method_label: view.method_label,
            receipt_ref: payment.receipt_ref,
            created_at: payment.created_at,
        }
    }
}

/// Response after recording a payment.
#[derive(Debug, Serialize)]
pub struct RecordedPaymentResponse {
    /// The stored payment.
    pub payment: PaymentResponse,
    /// Balance after the payment.
    pub balance: InvoiceBalance,
}

impl From<RecordedPayment> for RecordedPaymentResponse {
    fn from(recorded: RecordedPayment) -> Self {
        Self {
            payment: PaymentView {
                payment: recorded.payment,
                method_label: recorded.method_label,
            }
            .into(),
            balance: recorded.balance,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/invoices/{id}/balance` - Re-aggregated balance of an invoice.
async fn invoice_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CreditRepository::new((*state.db).clone());
    Ok(Json(repo.invoice_balance(id).await?))
}

/// GET `/invoices/{id}/payments` - Payments of an invoice.
async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CreditRepository::new((*state.db).clone());
    let payments: Vec<PaymentResponse> = repo
        .list_payments(id)
        .await?
        .into_iter()
        .map(PaymentResponse::from)
        .collect();
    Ok(Json(payments))
}

/// POST `/invoices/{id}/payments` - Record a payment.
async fn record_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = payload.into_input()?;

    let repo = CreditRepository::new((*state.db).clone());
    let recorded = repo.record_payment(id, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(RecordedPaymentResponse::from(recorded)),
    ))
}

/// DELETE `/payments/{id}` - Delete a payment and re-derive the invoice state.
async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = CreditRepository::new((*state.db).clone());
    Ok(Json(repo.delete_payment(id).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(kind: &str) -> RecordPaymentRequest {
        RecordPaymentRequest {
            kind: kind.to_string(),
            installments: None,
            amount: None,
            payment_method_id: None,
            payment_method: Some("cash".into()),
            posted_on: NaiveDate::from_ymd_opt(2026, 3, 1),
            description: None,
            receipt_ref: None,
        }
    }

    #[test]
    fn test_installment_request() {
        let mut req = request("installment");
        req.installments = Some(dec!(1.5));
        let input = req.into_input().unwrap();
        assert_eq!(input.kind, PaymentKind::Installment);
        assert_eq!(input.quantity, dec!(1.5));
    }

    #[test]
    fn test_lump_sum_requires_amount() {
        let err = request("lump_sum").into_input().unwrap_err();
        assert_eq!(err.code(), "NON_POSITIVE_AMOUNT");
    }

    #[test]
    fn test_unknown_kind() {
        let err = request("barter").into_input().unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), "INVALID_PAYMENT_KIND");
    }

    #[test]
    fn test_method_is_required() {
        let mut req = request("lump_sum");
        req.amount = Some(dec!(10));
        req.payment_method = None;
        assert_eq!(req.into_input().unwrap_err().code(), "INVALID_METHOD");
    }

    #[test]
    fn test_quantities_outside_storage_rejected() {
        let mut huge = request("installment");
        huge.installments = Some(Decimal::MAX);
        assert_eq!(huge.into_input().unwrap_err().code(), "INVALID_AMOUNT");

        let mut fine_grained = request("installment");
        fine_grained.installments = Some(dec!(0.33335));
        assert_eq!(fine_grained.into_input().unwrap_err().code(), "INVALID_AMOUNT");

        let mut lump = request("lump_sum");
        lump.amount = Some(Decimal::MAX);
        assert_eq!(lump.into_input().unwrap_err().code(), "INVALID_AMOUNT");
    }
}
