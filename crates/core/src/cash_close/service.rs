//! Cash-close aggregation service.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use backoffice_shared::types::clamp_non_negative;

use super::types::{
    CashCloseFilter, CashCloseInvoice, CashClosePayment, CashCloseReport, CashCloseTotals,
    DayTotal, GroupTotal, Movement, MovementKind,
};
use crate::credit::{UNSPECIFIED_LABEL, is_credit_account_label, normalize_label};

/// Service for closing the cash register over a date range.
pub struct CashCloseService;

impl CashCloseService {
    /// Builds the cash-close report.
    ///
    /// `invoices` and `payments` may contain rows outside the filter; they
    /// are filtered here. Payments count as collections only when their
    /// invoice was billed on a credit account. The method filter applies to
    /// invoices alone.
    #[must_use]
    pub fn compute(
        filter: CashCloseFilter,
        invoices: &[CashCloseInvoice],
        payments: &[CashClosePayment],
    ) -> CashCloseReport {
        let invoices: Vec<&CashCloseInvoice> = invoices
            .iter()
            .filter(|i| filter.contains_date(i.issued_on))
            .filter(|i| filter.matches_seller(&i.seller))
            .filter(|i| filter.matches_method(&i.method_label))
            .collect();

        let collections: Vec<&CashClosePayment> = payments
            .iter()
            .filter(|p| is_credit_account_label(&p.invoice_method_label))
            .filter(|p| filter.contains_date(p.posted_on))
            .filter(|p| filter.matches_seller(&p.seller))
            .collect();

        let by_seller = Self::group_by(&invoices, |i| group_key(&i.seller));
        let by_method = Self::group_by(&invoices, |i| group_key(&i.method_label));
        let by_day = Self::by_day(&invoices, &collections);
        let totals = Self::totals(&invoices, &collections, &by_method);
        let movements = Self::movements(&invoices, &collections);

        CashCloseReport {
            filter,
            by_seller,
            by_method,
            by_day,
            totals,
            movements,
        }
    }

    fn group_by<F>(invoices: &[&CashCloseInvoice], key: F) -> Vec<GroupTotal>
    where
        F: Fn(&CashCloseInvoice) -> String,
    {
        let mut groups: BTreeMap<String, GroupTotal> = BTreeMap::new();
        for invoice in invoices {
            let key = key(invoice);
            let group = groups.entry(key.clone()).or_insert_with(|| GroupTotal {
                key,
                total: Decimal::ZERO,
                invoice_count: 0,
            });
            group.total += invoice.total_with_interest;
            group.invoice_count += 1;
        }
        groups.into_values().collect()
    }

    fn by_day(
        invoices: &[&CashCloseInvoice],
        collections: &[&CashClosePayment],
    ) -> Vec<DayTotal> {
        let mut days: BTreeMap<NaiveDate, DayTotal> = BTreeMap::new();
        for invoice in invoices {
            day_entry(&mut days, invoice.issued_on).billed += invoice.total_with_interest;
        }
        for payment in collections {
            day_entry(&mut days, payment.posted_on).collected_on_credit_accounts += payment.amount;
        }
        days.into_values().rev().collect()
    }

    fn totals(
        invoices: &[&CashCloseInvoice],
        collections: &[&CashClosePayment],
        by_method: &[GroupTotal],
    ) -> CashCloseTotals {
        let billed_total = invoices.iter().map(|i| i.total_with_interest).sum();
        let collected_on_credit_accounts: Decimal = collections.iter().map(|p| p.amount).sum();

        let (credit, other): (Vec<&GroupTotal>, Vec<&GroupTotal>) = by_method
            .iter()
            .partition(|g| is_credit_account_label(&g.key));
        let billed_on_credit_accounts = credit.iter().map(|g| g.total).sum();
        let non_credit: Decimal = other.iter().map(|g| g.total).sum();

        let pending_on_credit_accounts = invoices
            .iter()
            .filter(|i| is_credit_account_label(&i.method_label))
            .map(|i| clamp_non_negative(i.total_with_interest - i.paid_total))
            .sum();

        CashCloseTotals {
            billed_total,
            cash_total: non_credit + collected_on_credit_accounts,
            collected_on_credit_accounts,
            billed_on_credit_accounts,
            pending_on_credit_accounts,
        }
    }

    fn movements(
        invoices: &[&CashCloseInvoice],
        collections: &[&CashClosePayment],
    ) -> Vec<Movement> {
        let mut movements: Vec<Movement> = collections
            .iter()
            .map(|p| Movement {
                kind: MovementKind::Payment,
                id: p.id.into_inner(),
                date: p.posted_on,
                invoice_number: p.invoice_number.clone(),
                seller: p.seller.clone(),
                method_label: group_key(&p.method_label),
                amount: p.amount,
                detail: p.description.clone(),
            })
            .chain(invoices.iter().map(|i| Movement {
                kind: MovementKind::Invoice,
                id: i.id.into_inner(),
                date: i.issued_on,
                invoice_number: i.invoice_number.clone(),
                seller: i.seller.clone(),
                method_label: group_key(&i.method_label),
                amount: i.total_with_interest,
                detail: i.customer_name.clone(),
            }))
            .collect();

        // Stable sort: payments were chained first, so they stay ahead on ties.
        movements.sort_by_key(|m| Reverse(m.date));
        movements
    }
}

fn day_entry(days: &mut BTreeMap<NaiveDate, DayTotal>, date: NaiveDate) -> &mut DayTotal {
    days.entry(date).or_insert_with(|| DayTotal {
        date,
        billed: Decimal::ZERO,
        collected_on_credit_accounts: Decimal::ZERO,
    })
}

fn group_key(raw: &str) -> String {
    let key = normalize_label(raw);
    if key.is_empty() {
        UNSPECIFIED_LABEL.to_string()
    } else {
        key
    }
}
