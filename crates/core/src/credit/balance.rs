//! Invoice balance calculations.
//!
//! Balances are always re-aggregated from the stored payment rows. Nothing
//! cached on the invoice is trusted, so deleting a payment is reflected on
//! the next read.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use backoffice_shared::types::{InvoiceId, clamp_non_negative};

use super::types::{CreditInvoice, CreditState, PaymentAmounts};

/// Paid and remaining figures of one invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceBalance {
    /// The invoice ID.
    pub invoice_id: InvoiceId,
    /// Amount owed, interest included.
    pub total_with_interest: Decimal,
    /// Installment money plus extra payments.
    pub paid_total: Decimal,
    /// Installment money alone.
    pub installments_only_total: Decimal,
    /// `max(0, total_with_interest - paid_total)`.
    pub remaining_total: Decimal,
    /// State derived from the totals.
    pub credit_state: CreditState,
    /// Installments covered so far.
    pub installments_paid: Decimal,
    /// `max(0, installment_count - installments_paid)`.
    pub installments_remaining: Decimal,
}

impl InvoiceBalance {
    /// Aggregates the payments of an invoice.
    #[must_use]
    pub fn from_payments(invoice: &CreditInvoice, payments: &[PaymentAmounts]) -> Self {
        let installments_only_total: Decimal =
            payments.iter().map(|p| p.installment_amount_paid).sum();
        let extra_total: Decimal = payments.iter().map(|p| p.extra_payment_amount).sum();
        let paid_total = installments_only_total + extra_total;
        let installments_paid: Decimal = payments.iter().map(|p| p.installment_count_paid).sum();

        Self {
            invoice_id: invoice.id,
            total_with_interest: invoice.total_with_interest,
            paid_total,
            installments_only_total,
            remaining_total: clamp_non_negative(invoice.total_with_interest - paid_total),
            credit_state: CreditState::from_totals(paid_total, invoice.total_with_interest),
            installments_paid,
            installments_remaining: remaining_installments(
                invoice.installment_count,
                installments_paid,
            ),
        }
    }
}

/// Installments still owed, never negative.
#[must_use]
pub fn remaining_installments(installment_count: i32, cumulative: Decimal) -> Decimal {
    clamp_non_negative(Decimal::from(installment_count) - cumulative)
}
