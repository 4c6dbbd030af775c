//! Credit ledger error types.

use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during credit ledger operations.
#[derive(Debug, Error)]
pub enum CreditError {
    // ========== Validation Errors ==========
    /// The payment would take the paid total above the amount owed.
    #[error("Payment of {attempted} exceeds the outstanding balance of {outstanding}")]
    Overpayment {
        /// Amount of the rejected payment.
        attempted: Decimal,
        /// Balance still owed before the payment.
        outstanding: Decimal,
    },

    /// Payment amount must be greater than zero.
    #[error("Payment amount must be greater than zero")]
    NonPositiveAmount,

    /// Installment count must be greater than zero.
    #[error("Installment count must be greater than zero")]
    NonPositiveInstallmentCount,

    /// Invoice totals cannot be negative.
    #[error("Invoice total cannot be negative")]
    NegativeTotal,

    /// Amount or installment count outside what the ledger can store.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Text field blank or longer than its column.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// Unknown delivery state.
    #[error("Invalid delivery state: {0}")]
    InvalidDeliveryState(String),

    /// Payment method reference cannot be resolved.
    #[error("Invalid payment method: {0}")]
    InvalidMethod(String),

    // ========== Lookup Errors ==========
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(Uuid),

    /// Payment not found.
    #[error("Payment not found: {0}")]
    PaymentNotFound(Uuid),

    /// Payment method catalog entry not found.
    #[error("Payment method not found: {0}")]
    PaymentMethodNotFound(Uuid),

    // ========== Conflict Errors ==========
    /// Invoice number already used.
    #[error("Invoice number already exists: {0}")]
    DuplicateInvoiceNumber(String),

    /// Payment method name already used.
    #[error("Payment method already exists: {0}")]
    DuplicatePaymentMethod(String),

    // ========== Infrastructure Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CreditError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::NonPositiveInstallmentCount => "NON_POSITIVE_INSTALLMENT_COUNT",
            Self::NegativeTotal => "NEGATIVE_TOTAL",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidField(_) => "INVALID_FIELD",
            Self::InvalidDeliveryState(_) => "INVALID_DELIVERY_STATE",
            Self::InvalidMethod(_) => "INVALID_METHOD",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::PaymentNotFound(_) => "PAYMENT_NOT_FOUND",
            Self::PaymentMethodNotFound(_) => "PAYMENT_METHOD_NOT_FOUND",
            Self::DuplicateInvoiceNumber(_) => "DUPLICATE_INVOICE_NUMBER",
            Self::DuplicatePaymentMethod(_) => "DUPLICATE_PAYMENT_METHOD",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::NonPositiveAmount
            | Self::NonPositiveInstallmentCount
            | Self::NegativeTotal
            | Self::InvalidAmount(_)
            | Self::InvalidField(_)
            | Self::InvalidDeliveryState(_)
            | Self::InvalidMethod(_) => 400,

            // 404 Not Found
            Self::InvoiceNotFound(_) | Self::PaymentNotFound(_) | Self::PaymentMethodNotFound(_) => {
                404
            }

            // 409 Conflict
            Self::DuplicateInvoiceNumber(_) | Self::DuplicatePaymentMethod(_) => 409,

            // 422 Unprocessable - business rule
            Self::Overpayment { .. } => 422,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }
}
