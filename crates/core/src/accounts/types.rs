//! Credit account listing types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_shared::types::InvoiceId;

use crate::credit::CreditState;

/// An invoice billed on a credit account, with its re-aggregated paid total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditAccountInvoice {
    /// The invoice ID.
    pub id: InvoiceId,
    /// Invoice number.
    pub invoice_number: String,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Customer national ID.
    pub customer_dni: String,
    /// Customer name.
    pub customer_name: String,
    /// Seller name.
    pub seller: String,
    /// Normalized payment method label.
    pub method_label: String,
    /// Amount owed, interest included.
    pub total_with_interest: Decimal,
    /// Sum of recorded payments.
    pub paid_total: Decimal,
}

/// Filters of the outstanding-accounts listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingFilter {
    /// Exact customer DNI.
    pub dni: Option<String>,
    /// Exact issue date.
    pub issued_on: Option<NaiveDate>,
}

/// Filters of the credit portfolio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioFilter {
    /// Case-insensitive substring of the customer name.
    pub customer_name: Option<String>,
    /// First issue date included.
    pub date_from: Option<NaiveDate>,
    /// Last issue date included.
    pub date_to: Option<NaiveDate>,
}

/// One line of a credit account listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLine {
    /// The invoice ID.
    pub invoice_id: InvoiceId,
    /// Invoice number.
    pub invoice_number: String,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Customer national ID.
    pub customer_dni: String,
    /// Customer name.
    pub customer_name: String,
    /// Seller name.
    pub seller: String,
    /// Amount owed, interest included.
    pub total_with_interest: Decimal,
    /// Sum of recorded payments.
    pub paid_total: Decimal,
    /// `max(0, total_with_interest - paid_total)`.
    pub remaining_total: Decimal,
    /// State derived from the totals.
    pub credit_state: CreditState,
}

/// Credit accounts with money still owed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutstandingAccounts {
    /// Invoices, newest invoice number first.
    pub accounts: Vec<AccountLine>,
    /// Sum of `total_with_interest`.
    pub total_billed: Decimal,
    /// Sum of `paid_total`.
    pub total_paid: Decimal,
    /// Sum of `remaining_total`.
    pub total_outstanding: Decimal,
}

/// All credit accounts split by state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditPortfolio {
    /// Fully paid invoices.
    pub paid: Vec<AccountLine>,
    /// Invoices with money still owed.
    pub pending: Vec<AccountLine>,
    /// Billed amount of the paid invoices.
    pub total_paid: Decimal,
    /// Billed amount of the pending invoices.
    pub total_pending: Decimal,
    /// Number of paid invoices.
    pub count_paid: usize,
    /// Number of pending invoices.
    pub count_pending: usize,
    /// `total_paid + total_pending`.
    pub grand_total: Decimal,
    /// `count_paid + count_pending`.
    pub grand_count: usize,
}
