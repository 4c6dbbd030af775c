//! Credit payment repository.
//!
//! Records and deletes payments against credit-account invoices. Every write
//! runs in one database transaction holding a row lock on the invoice, so
//! two concurrent payments cannot both pass the overpayment check.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use backoffice_core::credit::{
    CreditError, CreditService, InvoiceBalance, PaymentAmounts, RecordPaymentInput, label_of,
};
use backoffice_shared::types::PaymentId;

use super::error::RepositoryError;
use super::payment_method::PaymentMethodRepository;
use crate::entities::{credit_payments, invoices};

/// A stored payment together with the invoice balance after it.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The new payment row.
    pub payment: credit_payments::Model,
    /// Normalized label of the payment method.
    pub method_label: String,
    /// Balance after the payment.
    pub balance: InvoiceBalance,
}

/// A stored payment with its method label.
#[derive(Debug, Clone)]
pub struct PaymentView {
    /// The payment row.
    pub payment: credit_payments::Model,
    /// Normalized label of the payment method.
    pub method_label: String,
}

/// Repository for credit payments.
#[derive(Debug, Clone)]
pub struct CreditRepository {
    db: DatabaseConnection,
}

impl CreditRepository {
    /// Creates a new credit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a payment against an invoice.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The invoice does not exist
    /// - The payment method cannot be resolved
    /// - The quantity is not positive
    /// - The payment would exceed the amount owed
    ///
    /// Nothing is written when an error is returned.
    pub async fn record_payment(
        &self,
        invoice_id: Uuid,
        input: RecordPaymentInput,
    ) -> Result<RecordedPayment, RepositoryError> {
        let txn = self.db.begin().await?;

        let invoice = lock_invoice(&txn, invoice_id).await?;
        let method = PaymentMethodRepository::resolve(&txn, input.method.clone()).await?;
        let existing = invoice_payments(&txn, invoice_id).await?;

        let credit_invoice = invoice.to_credit_invoice();
        let mut amounts: Vec<PaymentAmounts> =
            existing.iter().map(credit_payments::Model::amounts).collect();

        let plan = match CreditService::plan_payment(&credit_invoice, &amounts, &input, &method) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(invoice_id = %invoice_id, error = %err, "Payment rejected");
                return Err(err.into());
            }
        };

        let (payment_method_id, payment_method_text) = method.reference.to_columns();
        let payment = credit_payments::ActiveModel {
            id: Set(PaymentId::new().into_inner()),
            invoice_id: Set(invoice_id),
            installment_amount_paid: Set(plan.amounts.installment_amount_paid),
            extra_payment_amount: Set(plan.amounts.extra_payment_amount),
            installment_count_paid: Set(plan.amounts.installment_count_paid),
            installment_count_cumulative: Set(plan.installment_count_cumulative),
            installment_count_remaining: Set(plan.installment_count_remaining),
            posted_on: Set(input.posted_on),
            description: Set(plan.description.clone()),
            payment_method_id: Set(payment_method_id),
            payment_method_text: Set(payment_method_text),
            receipt_ref: Set(input.receipt_ref.clone()),
            created_at: Set(Utc::now().into()),
        };
        let payment = payment.insert(&txn).await?;
        amounts.push(plan.amounts);

        let settlement = CreditService::settle(&credit_invoice, &amounts, &method);
        let invoice = if settlement.changes(&credit_invoice) {
            let mut active: invoices::ActiveModel = invoice.into();
            active.credit_state = Set(settlement.credit_state.into());
            if let Some(backfill) = &settlement.backfill_method {
                let (id, text) = backfill.to_columns();
                active.payment_method_id = Set(id);
                active.payment_method_text = Set(text);
            }
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?
        } else {
            invoice
        };

        txn.commit().await?;

        let balance = InvoiceBalance::from_payments(&invoice.to_credit_invoice(), &amounts);
        info!(
            invoice_id = %invoice_id,
            payment_id = %payment.id,
            amount = %plan.amount(),
            paid_total = %balance.paid_total,
            credit_state = balance.credit_state.as_str(),
            method_backfilled = settlement.backfill_method.is_some(),
            "Payment recorded"
        );

        Ok(RecordedPayment {
            payment,
            method_label: method.label,
            balance,
        })
    }

    /// Deletes a payment and re-derives the invoice state.
    ///
    /// The deletion is not re-validated. A paid invoice whose paid total
    /// drops below its total goes back to pending.
    ///
    /// # Errors
    ///
    /// Returns `PaymentNotFound` if the payment does not exist, or a database error.
    pub async fn delete_payment(&self, payment_id: Uuid) -> Result<InvoiceBalance, RepositoryError> {
        let txn = self.db.begin().await?;

        let payment = credit_payments::Entity::find_by_id(payment_id)
            .one(&txn)
            .await?
            .ok_or(CreditError::PaymentNotFound(payment_id))?;
        let invoice = lock_invoice(&txn, payment.invoice_id).await?;

        payment.delete(&txn).await?;

        let remaining: Vec<PaymentAmounts> = invoice_payments(&txn, invoice.id)
            .await?
            .iter()
            .map(credit_payments::Model::amounts)
            .collect();
        let credit_invoice = invoice.to_credit_invoice();
        let balance = CreditService::rederive_after_deletion(&credit_invoice, &remaining);

        if balance.credit_state != credit_invoice.credit_state {
            let mut active: invoices::ActiveModel = invoice.into();
            active.credit_state = Set(balance.credit_state.into());
            active.updated_at = Set(Utc::now().into());
            active.update(&txn).await?;
        }

        txn.commit().await?;

        info!(
            payment_id = %payment_id,
            invoice_id = %balance.invoice_id,
            paid_total = %balance.paid_total,
            credit_state = balance.credit_state.as_str(),
            "Payment deleted"
        );
        Ok(balance)
    }

    /// Re-aggregates the balance of an invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if the invoice does not exist, or a database error.
    pub async fn invoice_balance(&self, invoice_id: Uuid) -> Result<InvoiceBalance, RepositoryError> {
        let invoice = invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::InvoiceNotFound(invoice_id))?;

        let amounts: Vec<PaymentAmounts> = invoice_payments(&self.db, invoice_id)
            .await?
            .iter()
            .map(credit_payments::Model::amounts)
            .collect();

        Ok(InvoiceBalance::from_payments(
            &invoice.to_credit_invoice(),
            &amounts,
        ))
    }

    /// Lists the payments of an invoice by posting date, then creation time.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceNotFound` if the invoice does not exist, or a database error.
    pub async fn list_payments(&self, invoice_id: Uuid) -> Result<Vec<PaymentView>, RepositoryError> {
        let exists = invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await?
            .is_some();
        if !exists {
            return Err(CreditError::InvoiceNotFound(invoice_id).into());
        }

        let payments = invoice_payments(&self.db, invoice_id).await?;
        let names = PaymentMethodRepository::names(&self.db).await?;

        Ok(payments
            .into_iter()
            .map(|payment| PaymentView {
                method_label: label_of(payment.method_ref().as_ref(), |id| {
                    names.get(&id).cloned()
                }),
                payment,
            })
            .collect())
    }
}

/// Loads an invoice with `SELECT ... FOR UPDATE`.
async fn lock_invoice(
    txn: &DatabaseTransaction,
    invoice_id: Uuid,
) -> Result<invoices::Model, RepositoryError> {
    let invoice = invoices::Entity::find_by_id(invoice_id)
        .lock_exclusive()
        .one(txn)
        .await?
        .ok_or(CreditError::InvoiceNotFound(invoice_id))?;
    Ok(invoice)
}

async fn invoice_payments<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
) -> Result<Vec<credit_payments::Model>, DbErr> {
    credit_payments::Entity::find()
        .filter(credit_payments::Column::InvoiceId.eq(invoice_id))
        .order_by_asc(credit_payments::Column::PostedOn)
        .order_by_asc(credit_payments::Column::CreatedAt)
        .all(conn)
        .await
}

/// Loads the payments of several invoices, grouped by invoice ID.
pub(crate) async fn payments_by_invoice<C: ConnectionTrait>(
    conn: &C,
    invoice_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<credit_payments::Model>>, DbErr> {
    let mut grouped: HashMap<Uuid, Vec<credit_payments::Model>> = HashMap::new();
    if invoice_ids.is_empty() {
        return Ok(grouped);
    }

    let payments = credit_payments::Entity::find()
        .filter(credit_payments::Column::InvoiceId.is_in(invoice_ids))
        .order_by_asc(credit_payments::Column::PostedOn)
        .order_by_asc(credit_payments::Column::CreatedAt)
        .all(conn)
        .await?;
    for payment in payments {
        grouped.entry(payment.invoice_id).or_default().push(payment);
    }
    Ok(grouped)
}
