//! `SeaORM` Entity for invoices table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use backoffice_core::credit::{CreditInvoice, PaymentMethodRef};
use backoffice_shared::types::InvoiceId;

use super::sea_orm_active_enums::{CreditState, DeliveryState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub invoice_number: String,
    pub issued_on: Date,
    pub seller: String,
    pub customer_dni: String,
    pub customer_name: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub total_with_interest: Decimal,
    pub installment_count: i32,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))", nullable)]
    pub installment_amount: Option<Decimal>,
    pub payment_method_id: Option<Uuid>,
    pub payment_method_text: Option<String>,
    pub credit_state: CreditState,
    pub delivery_state: DeliveryState,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::credit_payments::Entity")]
    CreditPayments,
    #[sea_orm(
        belongs_to = "super::payment_methods::Entity",
        from = "Column::PaymentMethodId",
        to = "super::payment_methods::Column::Id"
    )]
    PaymentMethods,
}

impl Related<super::credit_payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CreditPayments.def()
    }
}

impl Related<super::payment_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Payment method reference stored on the invoice.
    ///
    /// Rows always carry one of the two columns; a row with neither reads as
    /// the unspecified placeholder.
    #[must_use]
    pub fn method_ref(&self) -> PaymentMethodRef {
        PaymentMethodRef::from_columns(self.payment_method_id, self.payment_method_text.clone())
            .unwrap_or_else(PaymentMethodRef::unspecified)
    }

    /// The fields the credit ledger works with.
    #[must_use]
    pub fn to_credit_invoice(&self) -> CreditInvoice {
        CreditInvoice {
            id: InvoiceId::from_uuid(self.id),
            total_with_interest: self.total_with_interest,
            installment_count: self.installment_count,
            installment_amount: self.installment_amount,
            payment_method: self.method_ref(),
            credit_state: self.credit_state.into(),
        }
    }
}
