//! Credit account listing service.

use std::cmp::Reverse;

use rust_decimal::Decimal;

use backoffice_shared::types::clamp_non_negative;

use super::types::{
    AccountLine, CreditAccountInvoice, CreditPortfolio, OutstandingAccounts, OutstandingFilter,
    PortfolioFilter,
};
use crate::credit::{CreditState, is_credit_account_label, normalize_label};

/// Service for listing credit accounts.
pub struct AccountsService;

impl AccountsService {
    /// Credit-account invoices that still have a balance to collect.
    ///
    /// Invoices billed with any other method are skipped.
    #[must_use]
    pub fn outstanding_accounts(
        filter: &OutstandingFilter,
        invoices: &[CreditAccountInvoice],
    ) -> OutstandingAccounts {
        let dni = filter.dni.as_deref().map(str::trim).filter(|d| !d.is_empty());

        let mut accounts: Vec<AccountLine> = invoices
            .iter()
            .filter(|i| is_credit_account_label(&i.method_label))
            .filter(|i| dni.is_none_or(|dni| i.customer_dni.trim() == dni))
            .filter(|i| filter.issued_on.is_none_or(|date| i.issued_on == date))
            .map(Self::line)
            .filter(|line| line.remaining_total > Decimal::ZERO)
            .collect();
        accounts.sort_by(|a, b| {
            b.invoice_number
                .cmp(&a.invoice_number)
                .then(b.issued_on.cmp(&a.issued_on))
        });

        OutstandingAccounts {
            total_billed: accounts.iter().map(|a| a.total_with_interest).sum(),
            total_paid: accounts.iter().map(|a| a.paid_total).sum(),
            total_outstanding: accounts.iter().map(|a| a.remaining_total).sum(),
            accounts,
        }
    }

    /// All credit-account invoices split into paid and pending.
    #[must_use]
    pub fn credit_portfolio(
        filter: &PortfolioFilter,
        invoices: &[CreditAccountInvoice],
    ) -> CreditPortfolio {
        let name = filter
            .customer_name
            .as_deref()
            .map(normalize_label)
            .filter(|n| !n.is_empty());

        let mut lines: Vec<AccountLine> = invoices
            .iter()
            .filter(|i| is_credit_account_label(&i.method_label))
            .filter(|i| {
                name.as_deref()
                    .is_none_or(|n| normalize_label(&i.customer_name).contains(n))
            })
            .filter(|i| filter.date_from.is_none_or(|from| i.issued_on >= from))
            .filter(|i| filter.date_to.is_none_or(|to| i.issued_on <= to))
            .map(Self::line)
            .collect();
        lines.sort_by_key(|l| Reverse(l.issued_on));

        let (paid, pending): (Vec<AccountLine>, Vec<AccountLine>) = lines
            .into_iter()
            .partition(|l| l.credit_state == CreditState::Paid);

        let total_paid: Decimal = paid.iter().map(|l| l.total_with_interest).sum();
        let total_pending: Decimal = pending.iter().map(|l| l.total_with_interest).sum();

        CreditPortfolio {
            total_paid,
            total_pending,
            count_paid: paid.len(),
            count_pending: pending.len(),
            grand_total: total_paid + total_pending,
            grand_count: paid.len() + pending.len(),
            paid,
            pending,
        }
    }

    fn line(invoice: &CreditAccountInvoice) -> AccountLine {
        AccountLine {
            invoice_id: invoice.id,
            invoice_number: invoice.invoice_number.clone(),
            issued_on: invoice.issued_on,
            customer_dni: invoice.customer_dni.clone(),
            customer_name: invoice.customer_name.clone(),
            seller: invoice.seller.clone(),
            total_with_interest: invoice.total_with_interest,
            paid_total: invoice.paid_total,
            remaining_total: clamp_non_negative(invoice.total_with_interest - invoice.paid_total),
            credit_state: CreditState::from_totals(invoice.paid_total, invoice.total_with_interest),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backoffice_shared::types::InvoiceId;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, d).unwrap()
    }

    fn make(
        number: &str,
        dni: &str,
        name: &str,
        method: &str,
        issued_on: NaiveDate,
        total: Decimal,
        paid: Decimal,
    ) -> CreditAccountInvoice {
        CreditAccountInvoice {
            id: InvoiceId::new(),
            invoice_number: number.to_string(),
            issued_on,
            customer_dni: dni.to_string(),
            customer_name: name.to_string(),
            seller: "ana".to_string(),
            method_label: method.to_string(),
            total_with_interest: total,
            paid_total: paid,
        }
    }

    fn sample() -> Vec<CreditAccountInvoice> {
        vec![
            make("0001", "111", "Maria Lopez", "credit account", day(1), dec!(300), dec!(100)),
            make("0002", "222", "Juan Perez", "credit account", day(2), dec!(200), dec!(200)),
            make("0003", "111", "Maria Lopez", "credit account", day(3), dec!(150), Decimal::ZERO),
            make("0004", "111", "Maria Lopez", "cash", day(3), dec!(90), Decimal::ZERO),
        ]
    }

    #[test]
    fn test_outstanding_skips_paid_and_non_credit() {
        let result = AccountsService::outstanding_accounts(&OutstandingFilter::default(), &sample());

        let numbers: Vec<&str> = result
            .accounts
            .iter()
            .map(|a| a.invoice_number.as_str())
            .collect();
        assert_eq!(numbers, vec!["0003", "0001"]);
        assert_eq!(result.total_billed, dec!(450));
        assert_eq!(result.total_paid, dec!(100));
        assert_eq!(result.total_outstanding, dec!(350));
    }

    #[test]
    fn test_outstanding_filters_by_dni_and_date() {
        let by_dni = OutstandingFilter {
            dni: Some(" 111 ".into()),
            issued_on: None,
        };
        assert_eq!(
            AccountsService::outstanding_accounts(&by_dni, &sample()).accounts.len(),
            2
        );

        let by_date = OutstandingFilter {
            dni: Some("111".into()),
            issued_on: Some(day(1)),
        };
        let result = AccountsService::outstanding_accounts(&by_date, &sample());
        assert_eq!(result.accounts.len(), 1);
        assert_eq!(result.accounts[0].remaining_total, dec!(200));
    }

    #[test]
    fn test_portfolio_splits_by_state() {
        let result = AccountsService::credit_portfolio(&PortfolioFilter::default(), &sample());

        assert_eq!(result.count_paid, 1);
        assert_eq!(result.count_pending, 2);
        assert_eq!(result.total_paid, dec!(200));
        assert_eq!(result.total_pending, dec!(450));
        assert_eq!(result.grand_total, dec!(650));
        assert_eq!(result.grand_count, 3);
        assert_eq!(result.pending[0].issued_on, day(3));
    }

    #[test]
    fn test_portfolio_filters() {
        let filter = PortfolioFilter {
            customer_name: Some("maria".into()),
            date_from: Some(day(2)),
            date_to: None,
        };
        let result = AccountsService::credit_portfolio(&filter, &sample());
        assert_eq!(result.grand_count, 1);
        assert_eq!(result.pending[0].invoice_number, "0003");
    }
}
