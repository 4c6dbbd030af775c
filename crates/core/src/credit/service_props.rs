//! Property-based tests for CreditService.
//!
//! - Property 1: the paid total never exceeds the amount owed
//! - Property 2: an invoice is paid exactly when the paid total reaches its total
//! - Property 3: deleting every payment reopens a paid invoice
//! - Property 4: any quantity yields a plan or an error, never a panic

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use backoffice_shared::types::InvoiceId;

use super::balance::InvoiceBalance;
use super::error::CreditError;
use super::service::CreditService;
use super::types::{
    CreditInvoice, CreditState, PaymentAmounts, PaymentKind, PaymentMethodRef, RecordPaymentInput,
    ResolvedMethod,
};

/// Strategy to generate invoice totals (0.01 to 10,000.00).
fn invoice_total() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate any decimal, up to `Decimal::MAX`.
fn any_decimal() -> impl Strategy<Value = Decimal> {
    (any::<u32>(), any::<u32>(), any::<u32>(), any::<bool>(), 0u32..=28)
        .prop_map(|(lo, mid, hi, negative, scale)| Decimal::from_parts(lo, mid, hi, negative, scale))
}

/// Strategy to generate one payment request.
fn payment_request() -> impl Strategy<Value = (PaymentKind, Decimal)> {
    prop_oneof![
        (1i64..500i64).prop_map(|tenths| (PaymentKind::Installment, Decimal::new(tenths, 1))),
        (1i64..500_000i64).prop_map(|cents| (PaymentKind::LumpSum, Decimal::new(cents, 2))),
    ]
}

fn make_invoice(total: Decimal, installment_count: i32) -> CreditInvoice {
    CreditInvoice {
        id: InvoiceId::new(),
        total_with_interest: total,
        installment_count,
        installment_amount: None,
        payment_method: PaymentMethodRef::unspecified(),
        credit_state: CreditService::initial_state(total),
    }
}

fn make_input(kind: PaymentKind, quantity: Decimal) -> RecordPaymentInput {
    RecordPaymentInput {
        kind,
        quantity,
        method: PaymentMethodRef::Manual("cash".into()),
        posted_on: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        description: None,
        receipt_ref: None,
    }
}

/// Replays requests the way the repository does, keeping accepted payments.
fn replay(
    invoice: &mut CreditInvoice,
    requests: &[(PaymentKind, Decimal)],
) -> Vec<PaymentAmounts> {
    let method = ResolvedMethod {
        reference: PaymentMethodRef::Manual("cash".into()),
        label: "cash".into(),
    };
    let mut stored = Vec::new();
    for (kind, quantity) in requests {
        match CreditService::plan_payment(invoice, &stored, &make_input(*kind, *quantity), &method)
        {
            Ok(plan) => {
                stored.push(plan.amounts);
                let settlement = CreditService::settle(invoice, &stored, &method);
                invoice.credit_state = settlement.credit_state;
                if let Some(backfill) = settlement.backfill_method {
                    invoice.payment_method = backfill;
                }
            }
            Err(CreditError::Overpayment { .. } | CreditError::NonPositiveAmount) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    stored
}

proptest! {
    /// Property 1: accepted payments never take the paid total above the total.
    #[test]
    fn prop_paid_total_never_exceeds_total(
        total in invoice_total(),
        installments in 0i32..24,
        requests in prop::collection::vec(payment_request(), 0..12),
    ) {
        let mut invoice = make_invoice(total, installments);
        let stored = replay(&mut invoice, &requests);
        let balance = InvoiceBalance::from_payments(&invoice, &stored);

        prop_assert!(balance.paid_total <= total);
        prop_assert_eq!(balance.remaining_total, total - balance.paid_total);
        for payment in &stored {
            prop_assert!(payment.amount() > Decimal::ZERO);
        }
    }

    /// Property 2: the cached state always matches the re-aggregated totals.
    #[test]
    fn prop_state_matches_totals(
        total in invoice_total(),
        installments in 0i32..24,
        requests in prop::collection::vec(payment_request(), 0..12),
    ) {
        let mut invoice = make_invoice(total, installments);
        let stored = replay(&mut invoice, &requests);
        let balance = InvoiceBalance::from_payments(&invoice, &stored);

        prop_assert_eq!(
            invoice.credit_state == CreditState::Paid,
            balance.paid_total >= total
        );
        prop_assert_eq!(invoice.credit_state, balance.credit_state);
    }

    /// Property 3: paying off then deleting all payments reopens the invoice.
    #[test]
    fn prop_delete_all_reopens(total in invoice_total()) {
        let mut invoice = make_invoice(total, 1);
        let stored = replay(&mut invoice, &[(PaymentKind::LumpSum, total)]);
        prop_assert_eq!(stored.len(), 1);
        prop_assert_eq!(invoice.credit_state, CreditState::Paid);

        let balance = CreditService::rederive_after_deletion(&invoice, &[]);
        prop_assert_eq!(balance.paid_total, Decimal::ZERO);
        prop_assert_eq!(balance.credit_state, CreditState::Pending);
    }

    /// Overpayments report the exact outstanding balance.
    #[test]
    fn prop_overpayment_reports_outstanding(
        total in invoice_total(),
        excess in 1i64..10_000i64,
    ) {
        let invoice = make_invoice(total, 1);
        let method = ResolvedMethod {
            reference: PaymentMethodRef::Manual("cash".into()),
            label: "cash".into(),
        };
        let attempted = total + Decimal::new(excess, 2);
        let result = CreditService::plan_payment(
            &invoice,
            &[],
            &make_input(PaymentKind::LumpSum, attempted),
            &method,
        );
        match result {
            Err(CreditError::Overpayment { attempted: a, outstanding }) => {
                prop_assert_eq!(a, attempted);
                prop_assert_eq!(outstanding, total);
            }
            other => prop_assert!(false, "expected overpayment, got {:?}", other),
        }
    }

    /// Property 4: arbitrary quantities are planned or rejected without panicking.
    #[test]
    fn prop_any_quantity_is_handled(
        total in invoice_total(),
        installments in 0i32..24,
        installment_amount in proptest::option::of(invoice_total()),
        installment in any::<bool>(),
        quantity in any_decimal(),
    ) {
        let mut invoice = make_invoice(total, installments);
        invoice.installment_amount = installment_amount;
        let kind = if installment { PaymentKind::Installment } else { PaymentKind::LumpSum };
        let method = ResolvedMethod {
            reference: PaymentMethodRef::Manual("cash".into()),
            label: "cash".into(),
        };
        if let Ok(plan) =
            CreditService::plan_payment(&invoice, &[], &make_input(kind, quantity), &method)
        {
            prop_assert!(plan.amount() > Decimal::ZERO);
            prop_assert!(plan.amount() <= total);
            prop_assert!(plan.amounts.installment_count_paid.normalize().scale() <= 4);
        }
    }
}
