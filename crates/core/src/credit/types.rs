//! Credit ledger domain types.
//!
//! This module defines the types used to record installment and lump-sum
//! payments against invoices billed on a credit account.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_shared::types::{InvoiceId, PaymentMethodId};

use super::error::CreditError;

/// Whether a credit invoice still has an outstanding balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditState {
    /// Outstanding balance remains.
    Pending,
    /// Paid in full.
    Paid,
}

impl CreditState {
    /// Derives the state from a paid total and the amount owed.
    #[must_use]
    pub fn from_totals(paid_total: Decimal, total_with_interest: Decimal) -> Self {
        if paid_total >= total_with_interest {
            Self::Paid
        } else {
            Self::Pending
        }
    }

    /// Returns the wire name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

/// Delivery status of the goods on an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryState {
    /// Not yet delivered.
    Pending,
    /// Delivered and accepted by the customer.
    Accepted,
    /// Rejected by the customer.
    Rejected,
}

impl DeliveryState {
    /// Returns the wire name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

impl std::str::FromStr for DeliveryState {
    type Err = CreditError;

    /// Parses a delivery state, accepting `delivered` as an alias of `accepted`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" | "delivered" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(CreditError::InvalidDeliveryState(s.to_string())),
        }
    }
}

/// How a payment is expressed by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    /// A number of installments (may be fractional).
    Installment,
    /// A free amount paid on account.
    LumpSum,
}

impl PaymentKind {
    /// Returns a human label used in payment descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Installment => "Installment",
            Self::LumpSum => "Lump-sum",
        }
    }
}

impl std::str::FromStr for PaymentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "installment" => Ok(Self::Installment),
            "lump_sum" | "lump-sum" => Ok(Self::LumpSum),
            _ => Err(format!("Unknown payment kind: {s}")),
        }
    }
}

/// Reference to the payment method of an invoice or payment.
///
/// Either a catalog entry or free text entered at the counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PaymentMethodRef {
    /// Catalog entry.
    Known(PaymentMethodId),
    /// Free text.
    Manual(String),
}

/// A payment method reference together with its normalized label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMethod {
    /// The reference as stored.
    pub reference: PaymentMethodRef,
    /// Trimmed, lower-cased label.
    pub label: String,
}

/// The invoice fields the credit ledger works with.
#[derive(Debug, Clone)]
pub struct CreditInvoice {
    /// The invoice ID.
    pub id: InvoiceId,
    /// Amount owed, interest included.
    pub total_with_interest: Decimal,
    /// Number of installments agreed.
    pub installment_count: i32,
    /// Fixed amount per installment, if agreed.
    pub installment_amount: Option<Decimal>,
    /// Current payment method of the invoice.
    pub payment_method: PaymentMethodRef,
    /// Cached credit state.
    pub credit_state: CreditState,
}

/// Amount columns of a stored payment, used for re-aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaymentAmounts {
    /// Money paid as installments.
    pub installment_amount_paid: Decimal,
    /// Money paid on account outside installments.
    pub extra_payment_amount: Decimal,
    /// Installments covered by this payment.
    pub installment_count_paid: Decimal,
}

impl PaymentAmounts {
    /// Total money of this payment.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.installment_amount_paid + self.extra_payment_amount
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone)]
pub struct RecordPaymentInput {
    /// Installments or lump sum.
    pub kind: PaymentKind,
    /// Installment count for `Installment`, money for `LumpSum`.
    pub quantity: Decimal,
    /// Method used for this payment.
    pub method: PaymentMethodRef,
    /// Posting date.
    pub posted_on: NaiveDate,
    /// Optional description; a default is generated when absent.
    pub description: Option<String>,
    /// Optional receipt image reference.
    pub receipt_ref: Option<String>,
}

/// A validated payment ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentPlan {
    /// Amount columns of the new row.
    pub amounts: PaymentAmounts,
    /// Installments covered by all payments, this one included.
    pub installment_count_cumulative: Decimal,
    /// Installments still owed after this payment.
    pub installment_count_remaining: Decimal,
    /// Description stored on the row.
    pub description: String,
    /// Paid total before this payment.
    pub previous_paid_total: Decimal,
}

impl PaymentPlan {
    /// Money paid by this payment.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amounts.amount()
    }
}

/// Invoice changes to apply after a payment is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    /// State derived from the re-aggregated payments.
    pub credit_state: CreditState,
    /// New payment method for the invoice, when the old one was a placeholder.
    pub backfill_method: Option<PaymentMethodRef>,
}

impl Settlement {
    /// Returns true if the invoice row must be updated.
    #[must_use]
    pub fn changes(&self, invoice: &CreditInvoice) -> bool {
        self.credit_state != invoice.credit_state || self.backfill_method.is_some()
    }
}
