//! Credit account ledger.
//!
//! This module implements payments against invoices billed on a credit account:
//! - Payment method references and label normalization
//! - Balance re-aggregation from stored payments
//! - Overpayment rejection and settlement of fully paid invoices
//! - Error types for ledger operations

pub mod balance;
pub mod error;
pub mod method;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use balance::{InvoiceBalance, remaining_installments};
pub use error::CreditError;
pub use method::{
    CREDIT_ACCOUNT_LABEL, MAX_METHOD_NAME_LEN, UNSPECIFIED_LABEL, check_method_name,
    is_credit_account_label, label_of, normalize_label,
};
pub use service::{
    CreditService, INSTALLMENT_SCALE, MAX_CUSTOMER_NAME_LEN, MAX_DNI_LEN, MAX_INSTALLMENT_COUNT,
    MAX_INVOICE_NUMBER_LEN, MAX_SELLER_LEN,
};
pub use types::{
    CreditInvoice, CreditState, DeliveryState, PaymentAmounts, PaymentKind, PaymentMethodRef,
    PaymentPlan, RecordPaymentInput, ResolvedMethod, Settlement,
};
