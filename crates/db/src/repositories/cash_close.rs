//! Cash-close repository.
//!
//! Loads the invoices and credit payments of a date range and hands them to
//! [`CashCloseService`] for aggregation.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use backoffice_core::cash_close::{
    CashCloseFilter, CashCloseInvoice, CashClosePayment, CashCloseReport, CashCloseService,
};
use backoffice_core::credit::label_of;
use backoffice_shared::types::{InvoiceId, PaymentId};

use super::credit::payments_by_invoice;
use super::error::RepositoryError;
use super::payment_method::{MethodNames, PaymentMethodRepository};
use crate::entities::{credit_payments, invoices};

/// Repository for cash-close reports.
#[derive(Debug, Clone)]
pub struct CashCloseRepository {
    db: DatabaseConnection,
}

impl CashCloseRepository {
    /// Creates a new cash-close repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Builds the cash-close report for the filter.
    ///
    /// Dates are filtered in SQL; seller and method filters are applied on
    /// the normalized labels by the service.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn cash_close(
        &self,
        filter: CashCloseFilter,
    ) -> Result<CashCloseReport, RepositoryError> {
        let names = PaymentMethodRepository::names(&self.db).await?;

        let mut invoice_query = invoices::Entity::find().order_by_desc(invoices::Column::IssuedOn);
        if let Some(from) = filter.date_from {
            invoice_query = invoice_query.filter(invoices::Column::IssuedOn.gte(from));
        }
        if let Some(to) = filter.date_to {
            invoice_query = invoice_query.filter(invoices::Column::IssuedOn.lte(to));
        }
        let invoice_rows = invoice_query.all(&self.db).await?;

        let ids = invoice_rows.iter().map(|i| i.id).collect();
        let mut paid = payments_by_invoice(&self.db, ids).await?;

        let invoices: Vec<CashCloseInvoice> = invoice_rows
            .iter()
            .map(|invoice| {
                let paid_total = paid
                    .remove(&invoice.id)
                    .unwrap_or_default()
                    .iter()
                    .map(credit_payments::Model::amount)
                    .sum();
                to_cash_close_invoice(invoice, paid_total, &names)
            })
            .collect();

        let mut payment_query = credit_payments::Entity::find()
            .find_also_related(invoices::Entity)
            .order_by_desc(credit_payments::Column::PostedOn);
        if let Some(from) = filter.date_from {
            payment_query = payment_query.filter(credit_payments::Column::PostedOn.gte(from));
        }
        if let Some(to) = filter.date_to {
            payment_query = payment_query.filter(credit_payments::Column::PostedOn.lte(to));
        }
        let payments: Vec<CashClosePayment> = payment_query
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|(payment, invoice)| {
                invoice.map(|invoice| to_cash_close_payment(payment, &invoice, &names))
            })
            .collect();

        Ok(CashCloseService::compute(filter, &invoices, &payments))
    }
}

fn to_cash_close_invoice(
    invoice: &invoices::Model,
    paid_total: Decimal,
    names: &MethodNames,
) -> CashCloseInvoice {
    CashCloseInvoice {
        id: InvoiceId::from_uuid(invoice.id),
        invoice_number: invoice.invoice_number.clone(),
        issued_on: invoice.issued_on,
        seller: invoice.seller.clone(),
        customer_name: invoice.customer_name.clone(),
        total_with_interest: invoice.total_with_interest,
        method_label: label_of(Some(&invoice.method_ref()), |id| names.get(&id).cloned()),
        paid_total,
    }
}

fn to_cash_close_payment(
    payment: credit_payments::Model,
    invoice: &invoices::Model,
    names: &MethodNames,
) -> CashClosePayment {
    CashClosePayment {
        id: PaymentId::from_uuid(payment.id),
        invoice_id: InvoiceId::from_uuid(invoice.id),
        invoice_number: invoice.invoice_number.clone(),
        seller: invoice.seller.clone(),
        invoice_method_label: label_of(Some(&invoice.method_ref()), |id| names.get(&id).cloned()),
        method_label: label_of(payment.method_ref().as_ref(), |id| names.get(&id).cloned()),
        posted_on: payment.posted_on,
        amount: payment.amount(),
        description: payment.description,
    }
}
