//! Cash-close report types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_shared::types::{InvoiceId, PaymentId};

use crate::credit::normalize_label;

/// Filters of a cash-close run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCloseFilter {
    /// First day included.
    pub date_from: Option<NaiveDate>,
    /// Last day included.
    pub date_to: Option<NaiveDate>,
    /// Case-insensitive substring of the seller name.
    pub seller: Option<String>,
    /// Normalized payment method label, matched exactly.
    pub method: Option<String>,
}

impl CashCloseFilter {
    /// Returns true if the date lies within the inclusive range.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }

    /// Returns true if the seller matches the seller filter.
    #[must_use]
    pub fn matches_seller(&self, seller: &str) -> bool {
        match self.seller.as_deref().map(normalize_label) {
            Some(needle) if !needle.is_empty() => normalize_label(seller).contains(&needle),
            _ => true,
        }
    }

    /// Returns true if the normalized label matches the method filter.
    #[must_use]
    pub fn matches_method(&self, method_label: &str) -> bool {
        match self.method.as_deref().map(normalize_label) {
            Some(wanted) if !wanted.is_empty() => normalize_label(method_label) == wanted,
            _ => true,
        }
    }
}

/// An invoice as seen by the cash close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCloseInvoice {
    /// The invoice ID.
    pub id: InvoiceId,
    /// Invoice number.
    pub invoice_number: String,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Seller name as entered.
    pub seller: String,
    /// Customer name.
    pub customer_name: String,
    /// Amount billed, interest included.
    pub total_with_interest: Decimal,
    /// Normalized payment method label.
    pub method_label: String,
    /// Sum of the payments recorded against the invoice.
    pub paid_total: Decimal,
}

/// A credit payment as seen by the cash close.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashClosePayment {
    /// The payment ID.
    pub id: PaymentId,
    /// Invoice the payment belongs to.
    pub invoice_id: InvoiceId,
    /// Number of that invoice.
    pub invoice_number: String,
    /// Seller of that invoice.
    pub seller: String,
    /// Normalized method label of that invoice.
    pub invoice_method_label: String,
    /// Normalized method label of the payment itself.
    pub method_label: String,
    /// Posting date.
    pub posted_on: NaiveDate,
    /// Money received.
    pub amount: Decimal,
    /// Stored description.
    pub description: String,
}

/// Total of one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotal {
    /// Group key (normalized seller or method label).
    pub key: String,
    /// Sum of `total_with_interest`.
    pub total: Decimal,
    /// Number of invoices in the group.
    pub invoice_count: u32,
}

/// Totals of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTotal {
    /// The day.
    pub date: NaiveDate,
    /// Invoices issued that day.
    pub billed: Decimal,
    /// Credit-account payments posted that day.
    pub collected_on_credit_accounts: Decimal,
}

/// Kind of a cash-close movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Credit-account payment.
    Payment,
    /// Invoice.
    Invoice,
}

/// One line of the merged movement list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// Invoice or payment.
    pub kind: MovementKind,
    /// ID of the invoice or payment.
    pub id: uuid::Uuid,
    /// Issue or posting date.
    pub date: NaiveDate,
    /// Related invoice number.
    pub invoice_number: String,
    /// Seller of the related invoice.
    pub seller: String,
    /// Normalized method label.
    pub method_label: String,
    /// Money of the line.
    pub amount: Decimal,
    /// Customer for invoices, payment description for payments.
    pub detail: String,
}

/// Summary figures of a cash close.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCloseTotals {
    /// Sum of all filtered invoices.
    pub billed_total: Decimal,
    /// Non-credit invoices plus credit-account collections.
    pub cash_total: Decimal,
    /// Credit-account payments posted in range.
    pub collected_on_credit_accounts: Decimal,
    /// Invoices billed on credit accounts.
    pub billed_on_credit_accounts: Decimal,
    /// Remaining balance of the filtered credit-account invoices.
    pub pending_on_credit_accounts: Decimal,
}

/// Full cash-close report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashCloseReport {
    /// Filters used.
    pub filter: CashCloseFilter,
    /// Totals grouped by seller.
    pub by_seller: Vec<GroupTotal>,
    /// Totals grouped by payment method label.
    pub by_method: Vec<GroupTotal>,
    /// Totals grouped by day, newest first.
    pub by_day: Vec<DayTotal>,
    /// Summary figures.
    pub totals: CashCloseTotals,
    /// Invoices and credit-account payments, newest first.
    pub movements: Vec<Movement>,
}
