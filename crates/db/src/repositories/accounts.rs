//! Credit account listing repository.

use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use backoffice_core::accounts::{
    AccountsService, CreditAccountInvoice, CreditPortfolio, OutstandingAccounts,
    OutstandingFilter, PortfolioFilter,
};
use backoffice_core::credit::label_of;
use backoffice_shared::types::InvoiceId;

use super::credit::payments_by_invoice;
use super::error::RepositoryError;
use super::payment_method::{MethodNames, PaymentMethodRepository};
use crate::entities::{credit_payments, invoices};

/// Repository for credit account listings.
#[derive(Debug, Clone)]
pub struct AccountsRepository {
    db: DatabaseConnection,
}

impl AccountsRepository {
    /// Creates a new accounts repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Credit-account invoices with money still owed.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn outstanding_accounts(
        &self,
        filter: OutstandingFilter,
    ) -> Result<OutstandingAccounts, RepositoryError> {
        let mut query = invoices::Entity::find();
        if let Some(dni) = filter.dni.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            query = query.filter(invoices::Column::CustomerDni.eq(dni));
        }
        if let Some(date) = filter.issued_on {
            query = query.filter(invoices::Column::IssuedOn.eq(date));
        }

        let candidates = self.load(query).await?;
        Ok(AccountsService::outstanding_accounts(&filter, &candidates))
    }

    /// All credit-account invoices split by credit state.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub async fn credit_portfolio(
        &self,
        filter: PortfolioFilter,
    ) -> Result<CreditPortfolio, RepositoryError> {
        let mut query = invoices::Entity::find();
        if let Some(from) = filter.date_from {
            query = query.filter(invoices::Column::IssuedOn.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(invoices::Column::IssuedOn.lte(to));
        }

        let candidates = self.load(query).await?;
        Ok(AccountsService::credit_portfolio(&filter, &candidates))
    }

    async fn load(
        &self,
        query: sea_orm::Select<invoices::Entity>,
    ) -> Result<Vec<CreditAccountInvoice>, RepositoryError> {
        let names = PaymentMethodRepository::names(&self.db).await?;
        let rows = query.all(&self.db).await?;

        let ids = rows.iter().map(|i| i.id).collect();
        let mut payments = payments_by_invoice(&self.db, ids).await?;

        Ok(rows
            .into_iter()
            .map(|invoice| {
                let paid_total: Decimal = payments
                    .remove(&invoice.id)
                    .unwrap_or_default()
                    .iter()
                    .map(credit_payments::Model::amount)
                    .sum();
                to_account_invoice(invoice, paid_total, &names)
            })
            .collect())
    }
}

fn to_account_invoice(
    invoice: invoices::Model,
    paid_total: Decimal,
    names: &MethodNames,
) -> CreditAccountInvoice {
    CreditAccountInvoice {
        id: InvoiceId::from_uuid(invoice.id),
        method_label: label_of(Some(&invoice.method_ref()), |id| names.get(&id).cloned()),
        invoice_number: invoice.invoice_number,
        issued_on: invoice.issued_on,
        customer_dni: invoice.customer_dni,
        customer_name: invoice.customer_name,
        seller: invoice.seller,
        total_with_interest: invoice.total_with_interest,
        paid_total,
    }
}
