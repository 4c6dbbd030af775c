//! Tests for the cash-close report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use backoffice_shared::types::{InvoiceId, PaymentId};

use super::service::CashCloseService;
use super::types::{
    CashCloseFilter, CashCloseInvoice, CashClosePayment, GroupTotal, MovementKind,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
}

fn invoice(
    number: &str,
    issued_on: NaiveDate,
    seller: &str,
    method: &str,
    total: Decimal,
    paid: Decimal,
) -> CashCloseInvoice {
    CashCloseInvoice {
        id: InvoiceId::new(),
        invoice_number: number.to_string(),
        issued_on,
        seller: seller.to_string(),
        customer_name: format!("Customer {number}"),
        total_with_interest: total,
        method_label: method.to_string(),
        paid_total: paid,
    }
}

fn payment(of: &CashCloseInvoice, posted_on: NaiveDate, amount: Decimal) -> CashClosePayment {
    CashClosePayment {
        id: PaymentId::new(),
        invoice_id: of.id,
        invoice_number: of.invoice_number.clone(),
        seller: of.seller.clone(),
        invoice_method_label: of.method_label.clone(),
        method_label: "cash".to_string(),
        posted_on,
        amount,
        description: "Installment payment via cash".to_string(),
    }
}

fn group(key: &str, total: Decimal, invoice_count: u32) -> GroupTotal {
    GroupTotal {
        key: key.to_string(),
        total,
        invoice_count,
    }
}

#[test]
fn test_all_cash_invoices() {
    let invoices = vec![
        invoice("0001", day(1), "Ana", "cash", dec!(100.00), Decimal::ZERO),
        invoice("0002", day(2), " ana ", "Cash ", dec!(50.00), Decimal::ZERO),
    ];

    let report = CashCloseService::compute(CashCloseFilter::default(), &invoices, &[]);

    assert_eq!(report.by_seller, vec![group("ana", dec!(150.00), 2)]);
    assert_eq!(report.by_method, vec![group("cash", dec!(150.00), 2)]);
    assert_eq!(report.totals.billed_total, dec!(150.00));
    assert_eq!(report.totals.cash_total, dec!(150.00));
    assert_eq!(report.totals.collected_on_credit_accounts, Decimal::ZERO);
    assert_eq!(report.totals.billed_on_credit_accounts, Decimal::ZERO);
    assert_eq!(report.totals.pending_on_credit_accounts, Decimal::ZERO);
    assert_eq!(report.by_day.len(), 2);
    assert_eq!(report.by_day[0].date, day(2));
}

#[test]
fn test_mixed_cash_and_credit() {
    let credit = invoice("0002", day(1), "Bob", "Credit Account", dec!(300.00), dec!(100.00));
    let invoices = vec![
        invoice("0001", day(1), "Ana", "cash", dec!(100.00), Decimal::ZERO),
        credit.clone(),
        invoice("0003", day(2), "Bob", "card", dec!(40.00), Decimal::ZERO),
    ];
    let payments = vec![payment(&credit, day(2), dec!(100.00))];

    let report = CashCloseService::compute(CashCloseFilter::default(), &invoices, &payments);

    assert_eq!(
        report.by_method,
        vec![
            group("card", dec!(40.00), 1),
            group("cash", dec!(100.00), 1),
            group("credit account", dec!(300.00), 1),
        ]
    );
    assert_eq!(
        report.by_seller,
        vec![group("ana", dec!(100.00), 1), group("bob", dec!(340.00), 2)]
    );
    assert_eq!(report.totals.billed_total, dec!(440.00));
    assert_eq!(report.totals.billed_on_credit_accounts, dec!(300.00));
    assert_eq!(report.totals.collected_on_credit_accounts, dec!(100.00));
    assert_eq!(report.totals.cash_total, dec!(240.00));
    assert_eq!(report.totals.pending_on_credit_accounts, dec!(200.00));

    assert_eq!(report.by_day[0].date, day(2));
    assert_eq!(report.by_day[0].billed, dec!(40.00));
    assert_eq!(report.by_day[0].collected_on_credit_accounts, dec!(100.00));
    assert_eq!(report.by_day[1].billed, dec!(400.00));
    assert_eq!(report.by_day[1].collected_on_credit_accounts, Decimal::ZERO);

    let kinds: Vec<(NaiveDate, MovementKind)> =
        report.movements.iter().map(|m| (m.date, m.kind)).collect();
    assert_eq!(
        kinds,
        vec![
            (day(2), MovementKind::Payment),
            (day(2), MovementKind::Invoice),
            (day(1), MovementKind::Invoice),
            (day(1), MovementKind::Invoice),
        ]
    );
}

#[test]
fn test_credit_invoice_partially_collected() {
    let credit = invoice("0007", day(3), "Carla", "credit account", dec!(500.00), dec!(250.00));
    let payments = vec![
        payment(&credit, day(3), dec!(100.00)),
        payment(&credit, day(10), dec!(150.00)),
    ];
    let filter = CashCloseFilter {
        date_from: Some(day(10)),
        date_to: Some(day(10)),
        ..CashCloseFilter::default()
    };

    let report = CashCloseService::compute(filter, std::slice::from_ref(&credit), &payments);

    assert!(report.by_method.is_empty());
    assert_eq!(report.totals.billed_total, Decimal::ZERO);
    assert_eq!(report.totals.collected_on_credit_accounts, dec!(150.00));
    assert_eq!(report.totals.cash_total, dec!(150.00));
    assert_eq!(report.totals.pending_on_credit_accounts, Decimal::ZERO);
    assert_eq!(report.movements.len(), 1);
    assert_eq!(report.movements[0].kind, MovementKind::Payment);

    let whole_month = CashCloseFilter {
        date_from: Some(day(1)),
        date_to: Some(day(31)),
        ..CashCloseFilter::default()
    };
    let report = CashCloseService::compute(whole_month, &[credit], &payments);
    assert_eq!(report.totals.billed_on_credit_accounts, dec!(500.00));
    assert_eq!(report.totals.collected_on_credit_accounts, dec!(250.00));
    assert_eq!(report.totals.cash_total, dec!(250.00));
    assert_eq!(report.totals.pending_on_credit_accounts, dec!(250.00));
}

#[test]
fn test_payments_on_non_credit_invoices_are_ignored() {
    let cash = invoice("0001", day(1), "Ana", "cash", dec!(80.00), dec!(80.00));
    let payments = vec![payment(&cash, day(1), dec!(80.00))];

    let report =
        CashCloseService::compute(CashCloseFilter::default(), std::slice::from_ref(&cash), &payments);

    assert_eq!(report.totals.collected_on_credit_accounts, Decimal::ZERO);
    assert_eq!(report.totals.cash_total, dec!(80.00));
    assert_eq!(report.movements.len(), 1);
}

#[test]
fn test_seller_filter_is_case_insensitive_substring() {
    let credit = invoice("0002", day(1), "Roberto Diaz", "credit account", dec!(90.00), dec!(30.00));
    let invoices = vec![
        invoice("0001", day(1), "Ana", "cash", dec!(10.00), Decimal::ZERO),
        credit.clone(),
    ];
    let payments = vec![payment(&credit, day(1), dec!(30.00))];
    let filter = CashCloseFilter {
        seller: Some(" BERTO ".into()),
        ..CashCloseFilter::default()
    };

    let report = CashCloseService::compute(filter, &invoices, &payments);

    assert_eq!(report.by_seller, vec![group("roberto diaz", dec!(90.00), 1)]);
    assert_eq!(report.totals.collected_on_credit_accounts, dec!(30.00));
    assert_eq!(report.totals.cash_total, dec!(30.00));
}

#[test]
fn test_method_filter_matches_normalized_label() {
    let invoices = vec![
        invoice("0001", day(1), "Ana", "Cash", dec!(10.00), Decimal::ZERO),
        invoice("0002", day(1), "Ana", "cash register", dec!(20.00), Decimal::ZERO),
        invoice("0003", day(1), "Ana", "card", dec!(30.00), Decimal::ZERO),
    ];
    let filter = CashCloseFilter {
        method: Some("CASH".into()),
        ..CashCloseFilter::default()
    };

    let report = CashCloseService::compute(filter, &invoices, &[]);

    assert_eq!(report.by_method, vec![group("cash", dec!(10.00), 1)]);
    assert_eq!(report.totals.cash_total, dec!(10.00));
}

#[test]
fn test_blank_labels_group_as_unspecified() {
    let invoices = vec![invoice("0001", day(1), "  ", "", dec!(5.00), Decimal::ZERO)];
    let report = CashCloseService::compute(CashCloseFilter::default(), &invoices, &[]);
    assert_eq!(report.by_seller, vec![group("unspecified", dec!(5.00), 1)]);
    assert_eq!(report.by_method, vec![group("unspecified", dec!(5.00), 1)]);
}
