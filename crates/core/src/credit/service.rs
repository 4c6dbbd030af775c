//! Credit ledger service for payment validation and settlement.
//!
//! This module holds the business rules for recording a payment against a
//! credit invoice. The repository reads the invoice and its payments inside
//! a locked database transaction, asks this service for a [`PaymentPlan`],
//! persists it and then applies the [`Settlement`].

use rust_decimal::Decimal;

use backoffice_shared::types::{MAX_MONEY, clamp_non_negative, fits_money_column, round_money};

use super::balance::{InvoiceBalance, remaining_installments};
use super::error::CreditError;
use super::types::{
    CreditInvoice, CreditState, PaymentAmounts, PaymentKind, PaymentPlan, RecordPaymentInput,
    ResolvedMethod, Settlement,
};

/// Decimal places stored for installment counts (`NUMERIC(10,4)`).
pub const INSTALLMENT_SCALE: u32 = 4;

/// Largest installment count a payment row holds.
// 9_999_999_999 with scale 4 (`Decimal::new` is not const).
pub const MAX_INSTALLMENT_COUNT: Decimal =
    Decimal::from_parts(0x540B_E3FF, 0x2, 0, false, INSTALLMENT_SCALE);

/// Longest invoice number, in characters.
pub const MAX_INVOICE_NUMBER_LEN: usize = 50;
/// Longest seller name, in characters.
pub const MAX_SELLER_LEN: usize = 100;
/// Longest customer DNI, in characters.
pub const MAX_DNI_LEN: usize = 20;
/// Longest customer name, in characters.
pub const MAX_CUSTOMER_NAME_LEN: usize = 200;

/// Credit ledger service.
///
/// This service contains pure business logic with no database dependencies.
pub struct CreditService;

impl CreditService {
    /// Price of one installment.
    ///
    /// Uses the fixed installment amount when the invoice has one, otherwise
    /// `total_with_interest / installment_count` (a count of zero counts as one).
    #[must_use]
    pub fn installment_price(invoice: &CreditInvoice) -> Decimal {
        match invoice.installment_amount {
            Some(amount) => amount,
            None => {
                let count = Decimal::from(invoice.installment_count.max(1));
                invoice.total_with_interest / count
            }
        }
    }

    /// Checks a payment quantity without looking at the invoice.
    ///
    /// Installment counts need at most four decimal places and may not
    /// exceed [`MAX_INSTALLMENT_COUNT`]; lump sums may not exceed
    /// [`MAX_MONEY`] and must stay positive once rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns `NonPositiveInstallmentCount`, `NonPositiveAmount` or
    /// `InvalidAmount`.
    pub fn validate_quantity(kind: PaymentKind, quantity: Decimal) -> Result<(), CreditError> {
        match kind {
            PaymentKind::Installment => {
                if quantity <= Decimal::ZERO {
                    return Err(CreditError::NonPositiveInstallmentCount);
                }
                if quantity.normalize().scale() > INSTALLMENT_SCALE
                    || quantity > MAX_INSTALLMENT_COUNT
                {
                    return Err(CreditError::InvalidAmount(format!(
                        "installment count {quantity} needs at most {INSTALLMENT_SCALE} decimal places and a maximum of {MAX_INSTALLMENT_COUNT}"
                    )));
                }
            }
            PaymentKind::LumpSum => {
                if round_money(quantity) <= Decimal::ZERO {
                    return Err(CreditError::NonPositiveAmount);
                }
                if quantity > MAX_MONEY {
                    return Err(CreditError::InvalidAmount(format!(
                        "payment of {quantity} exceeds {MAX_MONEY}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Converts the caller's input into the amount columns of a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the quantity fails [`Self::validate_quantity`] or
    /// prices to zero.
    pub fn payment_amounts(
        invoice: &CreditInvoice,
        kind: PaymentKind,
        quantity: Decimal,
    ) -> Result<PaymentAmounts, CreditError> {
        Self::validate_quantity(kind, quantity)?;
        match kind {
            PaymentKind::Installment => {
                let amount = Self::installment_price(invoice)
                    .checked_mul(quantity)
                    .map(round_money)
                    .ok_or_else(|| {
                        CreditError::InvalidAmount(format!(
                            "installment count {quantity} is too large"
                        ))
                    })?;
                if amount <= Decimal::ZERO {
                    return Err(CreditError::NonPositiveAmount);
                }
                Ok(PaymentAmounts {
                    installment_amount_paid: amount,
                    extra_payment_amount: Decimal::ZERO,
                    installment_count_paid: quantity,
                })
            }
            PaymentKind::LumpSum => {
                let amount = round_money(quantity);
                Ok(PaymentAmounts {
                    installment_amount_paid: Decimal::ZERO,
                    extra_payment_amount: amount,
                    installment_count_paid: Decimal::ZERO,
                })
            }
        }
    }

    /// Validate a payment against the invoice and its existing payments.
    ///
    /// This function performs all validation steps:
    /// 1. Converts installments or a lump sum into money
    /// 2. Rejects payments that would exceed `total_with_interest`
    /// 3. Computes the cumulative and remaining installment counters
    ///
    /// # Errors
    ///
    /// Returns `CreditError` if validation fails. Nothing must be written
    /// when this returns an error.
    pub fn plan_payment(
        invoice: &CreditInvoice,
        existing: &[PaymentAmounts],
        input: &RecordPaymentInput,
        method: &ResolvedMethod,
    ) -> Result<PaymentPlan, CreditError> {
        let amounts = Self::payment_amounts(invoice, input.kind, input.quantity)?;

        let previous_paid_total: Decimal = existing.iter().map(PaymentAmounts::amount).sum();
        let attempted = amounts.amount();
        let exceeds = previous_paid_total
            .checked_add(attempted)
            .is_none_or(|paid| paid > invoice.total_with_interest);
        if exceeds {
            return Err(CreditError::Overpayment {
                attempted,
                outstanding: clamp_non_negative(invoice.total_with_interest - previous_paid_total),
            });
        }

        let previous_cumulative: Decimal =
            existing.iter().map(|p| p.installment_count_paid).sum();
        let installment_count_cumulative = previous_cumulative
            .checked_add(amounts.installment_count_paid)
            .filter(|cumulative| *cumulative <= MAX_INSTALLMENT_COUNT)
            .ok_or_else(|| {
                CreditError::InvalidAmount(format!(
                    "cumulative installment count would exceed {MAX_INSTALLMENT_COUNT}"
                ))
            })?;

        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map_or_else(
                || format!("{} payment via {}", input.kind.label(), method.label),
                ToString::to_string,
            );

        Ok(PaymentPlan {
            amounts,
            installment_count_cumulative,
            installment_count_remaining: remaining_installments(
                invoice.installment_count,
                installment_count_cumulative,
            ),
            description,
            previous_paid_total,
        })
    }

    /// Decide the invoice changes once a payment has been stored.
    ///
    /// `payments` must include the payment that was just inserted. When the
    /// invoice becomes fully paid and its method is a placeholder, the
    /// method of the final payment is backfilled. Any real method already on
    /// the invoice is kept.
    #[must_use]
    pub fn settle(
        invoice: &CreditInvoice,
        payments: &[PaymentAmounts],
        final_method: &ResolvedMethod,
    ) -> Settlement {
        let balance = InvoiceBalance::from_payments(invoice, payments);
        let backfill_method = (balance.credit_state == CreditState::Paid
            && invoice.payment_method.is_placeholder())
        .then(|| final_method.reference.clone());

        Settlement {
            credit_state: balance.credit_state,
            backfill_method,
        }
    }

    /// Re-derive the credit state after a payment was deleted.
    ///
    /// `remaining` holds the payments left on the invoice. A paid invoice
    /// that drops below its total goes back to pending.
    #[must_use]
    pub fn rederive_after_deletion(
        invoice: &CreditInvoice,
        remaining: &[PaymentAmounts],
    ) -> InvoiceBalance {
        InvoiceBalance::from_payments(invoice, remaining)
    }

    /// Validate the amounts of a new invoice.
    ///
    /// Amounts must be stored exactly: sub-cent digits are rejected rather
    /// than rounded so the cached state matches the stored total.
    ///
    /// # Errors
    ///
    /// Returns an error for negative totals, amounts with more than two
    /// decimal places or above [`MAX_MONEY`], a negative installment count,
    /// or a fixed installment amount that is not positive.
    pub fn validate_new_invoice(
        total: Decimal,
        total_with_interest: Decimal,
        installment_count: i32,
        installment_amount: Option<Decimal>,
    ) -> Result<(), CreditError> {
        if total < Decimal::ZERO || total_with_interest < Decimal::ZERO {
            return Err(CreditError::NegativeTotal);
        }
        if let Some(amount) = [total, total_with_interest]
            .into_iter()
            .chain(installment_amount)
            .find(|amount| !fits_money_column(*amount))
        {
            return Err(CreditError::InvalidAmount(format!(
                "{amount} needs at most two decimal places and a maximum of {MAX_MONEY}"
            )));
        }
        if installment_count < 0 {
            return Err(CreditError::NonPositiveInstallmentCount);
        }
        if installment_amount.is_some_and(|amount| amount <= Decimal::ZERO) {
            return Err(CreditError::NonPositiveAmount);
        }
        Ok(())
    }

    /// Validate the text fields of a new invoice, already trimmed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidField` for a blank invoice number or a field longer
    /// than its column.
    pub fn validate_invoice_text(
        invoice_number: &str,
        seller: &str,
        customer_dni: &str,
        customer_name: &str,
    ) -> Result<(), CreditError> {
        if invoice_number.is_empty() {
            return Err(CreditError::InvalidField("invoice_number is blank".to_string()));
        }
        let fields = [
            ("invoice_number", invoice_number, MAX_INVOICE_NUMBER_LEN),
            ("seller", seller, MAX_SELLER_LEN),
            ("customer_dni", customer_dni, MAX_DNI_LEN),
            ("customer_name", customer_name, MAX_CUSTOMER_NAME_LEN),
        ];
        for (name, value, max) in fields {
            if value.chars().count() > max {
                return Err(CreditError::InvalidField(format!(
                    "{name} is longer than {max} characters"
                )));
            }
        }
        Ok(())
    }

    /// Initial credit state of a new invoice.
    #[must_use]
    pub fn initial_state(total_with_interest: Decimal) -> CreditState {
        CreditState::from_totals(Decimal::ZERO, total_with_interest)
    }
}
