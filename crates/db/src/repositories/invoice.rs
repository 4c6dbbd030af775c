//! Invoice repository.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait, sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

use backoffice_core::credit::{
    CreditError, CreditService, DeliveryState, InvoiceBalance, PaymentMethodRef, label_of,
};
use backoffice_shared::types::{InvoiceId, PageRequest, PageResponse};

use super::credit::payments_by_invoice;
use super::error::{RepositoryError, is_unique_violation};
use super::payment_method::{MethodNames, PaymentMethodRepository};
use crate::entities::{credit_payments, invoices};

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoiceInput {
    /// Invoice number, unique.
    pub invoice_number: String,
    /// Issue date.
    pub issued_on: NaiveDate,
    /// Seller name.
    pub seller: String,
    /// Customer national ID.
    pub customer_dni: String,
    /// Customer name.
    pub customer_name: String,
    /// Amount before interest.
    pub total: Decimal,
    /// Amount owed, interest included.
    pub total_with_interest: Decimal,
    /// Number of installments agreed.
    pub installment_count: i32,
    /// Fixed installment amount, if agreed.
    pub installment_amount: Option<Decimal>,
    /// Payment method; `None` stores the unspecified placeholder.
    pub payment_method: Option<PaymentMethodRef>,
}

/// Filter options for listing invoices.
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Case-insensitive substring of the seller name.
    pub seller: Option<String>,
    /// First issue date included.
    pub date_from: Option<NaiveDate>,
    /// Last issue date included.
    pub date_to: Option<NaiveDate>,
    /// Exact customer DNI.
    pub customer_dni: Option<String>,
}

/// An invoice with its method label and re-aggregated balance.
#[derive(Debug, Clone)]
pub struct InvoiceView {
    /// The invoice record.
    pub invoice: invoices::Model,
    /// Normalized payment method label.
    pub method_label: String,
    /// Balance from the stored payments.
    pub balance: InvoiceBalance,
}

/// Invoice repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Totals or installment figures are invalid
    /// - The payment method cannot be resolved
    /// - The invoice number already exists
    pub async fn create_invoice(
        &self,
        input: CreateInvoiceInput,
    ) -> Result<InvoiceView, RepositoryError> {
        CreditService::validate_new_invoice(
            input.total,
            input.total_with_interest,
            input.installment_count,
            input.installment_amount,
        )?;
        let invoice_number = input.invoice_number.trim().to_string();
        let seller = input.seller.trim().to_string();
        let customer_dni = input.customer_dni.trim().to_string();
        let customer_name = input.customer_name.trim().to_string();
        CreditService::validate_invoice_text(
            &invoice_number,
            &seller,
            &customer_dni,
            &customer_name,
        )?;

        let duplicate = invoices::Entity::find()
            .filter(invoices::Column::InvoiceNumber.eq(&invoice_number))
            .one(&self.db)
            .await?;
        if duplicate.is_some() {
            return Err(CreditError::DuplicateInvoiceNumber(invoice_number).into());
        }

        let method = match input.payment_method {
            Some(reference) => {
                PaymentMethodRepository::resolve(&self.db, reference)
                    .await?
                    .reference
            }
            None => PaymentMethodRef::unspecified(),
        };
        let (payment_method_id, payment_method_text) = method.to_columns();

        let now = Utc::now().into();
        let invoice = invoices::ActiveModel {
            id: Set(InvoiceId::new().into_inner()),
            invoice_number: Set(invoice_number.clone()),
            issued_on: Set(input.issued_on),
            seller: Set(seller),
            customer_dni: Set(customer_dni),
            customer_name: Set(customer_name),
            total: Set(input.total),
            total_with_interest: Set(input.total_with_interest),
            installment_count: Set(input.installment_count),
            installment_amount: Set(input.installment_amount),
            payment_method_id: Set(payment_method_id),
            payment_method_text: Set(payment_method_text),
            credit_state: Set(CreditService::initial_state(input.total_with_interest).into()),
            delivery_state: Set(DeliveryState::Pending.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let invoice = invoice.insert(&self.db).await.map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::from(CreditError::DuplicateInvoiceNumber(invoice_number.clone()))
            } else {
                RepositoryError::from(err)
            }
        })?;

        info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total_with_interest = %invoice.total_with_interest,
            "Invoice created"
        );

        let names = PaymentMethodRepository::names(&self.db).await?;
        Ok(view(invoice, &[], &names))
    }

    /// Finds an invoice with its balance.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if the invoice does not exist, or a database error.
    pub async fn get_invoice(&self, id: Uuid) -> Result<InvoiceView, RepositoryError> {
        let invoice = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::InvoiceNotFound(id))?;

        let payments = credit_payments::Entity::find()
            .filter(credit_payments::Column::InvoiceId.eq(id))
            .all(&self.db)
            .await?;
        let names = PaymentMethodRepository::names(&self.db).await?;

        Ok(view(invoice, &payments, &names))
    }

    /// Lists invoices, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_invoices(
        &self,
        filter: InvoiceFilter,
        page: PageRequest,
    ) -> Result<PageResponse<InvoiceView>, RepositoryError> {
        let page = page.normalized();
        let mut query = invoices::Entity::find()
            .order_by_desc(invoices::Column::IssuedOn)
            .order_by_desc(invoices::Column::InvoiceNumber);

        if let Some(seller) = filter.seller.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            query = query.filter(Expr::cust_with_values(
                "lower(seller) LIKE $1",
                [format!("%{}%", escape_like(&seller.to_lowercase()))],
            ));
        }
        if let Some(from) = filter.date_from {
            query = query.filter(invoices::Column::IssuedOn.gte(from));
        }
        if let Some(to) = filter.date_to {
            query = query.filter(invoices::Column::IssuedOn.lte(to));
        }
        if let Some(dni) = filter.customer_dni.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            query = query.filter(invoices::Column::CustomerDni.eq(dni));
        }

        let paginator = query.paginate(&self.db, page.limit());
        let total = paginator.num_items().await?;
        let rows = paginator.fetch_page(u64::from(page.page - 1)).await?;

        let ids: Vec<Uuid> = rows.iter().map(|i| i.id).collect();
        let mut payments = payments_by_invoice(&self.db, ids).await?;
        let names = PaymentMethodRepository::names(&self.db).await?;

        let data = rows
            .into_iter()
            .map(|invoice| {
                let own = payments.remove(&invoice.id).unwrap_or_default();
                view(invoice, &own, &names)
            })
            .collect();

        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }

    /// Updates the delivery state. Unchanged states are not written.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if the invoice does not exist, or a database error.
    pub async fn update_delivery_state(
        &self,
        id: Uuid,
        state: DeliveryState,
    ) -> Result<invoices::Model, RepositoryError> {
        let invoice = invoices::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::InvoiceNotFound(id))?;

        let new_state: crate::entities::sea_orm_active_enums::DeliveryState = state.into();
        if invoice.delivery_state == new_state {
            return Ok(invoice);
        }

        let mut active: invoices::ActiveModel = invoice.into();
        active.delivery_state = Set(new_state);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await?;

        info!(invoice_id = %id, delivery_state = state.as_str(), "Delivery state updated");
        Ok(updated)
    }

    /// Deletes an invoice together with its payments.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if the invoice does not exist, or a database error.
    pub async fn delete_invoice(&self, id: Uuid) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let invoice = invoices::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(CreditError::InvoiceNotFound(id))?;

        let payments = credit_payments::Entity::delete_many()
            .filter(credit_payments::Column::InvoiceId.eq(id))
            .exec(&txn)
            .await?;
        invoices::Entity::delete_by_id(invoice.id).exec(&txn).await?;

        txn.commit().await?;

        info!(
            invoice_id = %id,
            payments_deleted = payments.rows_affected,
            "Invoice deleted"
        );
        Ok(())
    }
}

fn view(
    invoice: invoices::Model,
    payments: &[credit_payments::Model],
    names: &MethodNames,
) -> InvoiceView {
    let amounts: Vec<_> = payments.iter().map(credit_payments::Model::amounts).collect();
    let balance = InvoiceBalance::from_payments(&invoice.to_credit_invoice(), &amounts);
    let method_label = label_of(Some(&invoice.method_ref()), |id| names.get(&id).cloned());
    InvoiceView {
        invoice,
        method_label,
        balance,
    }
}

/// Escapes `LIKE` wildcards in user input.
fn escape_like(raw: &str) -> String {
    raw.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("ana"), "ana");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
