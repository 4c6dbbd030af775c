//! `SeaORM` Entity for credit_payments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use backoffice_core::credit::{PaymentAmounts, PaymentMethodRef};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_payments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub installment_amount_paid: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub extra_payment_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))")]
    pub installment_count_paid: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))")]
    pub installment_count_cumulative: Decimal,
    #[sea_orm(column_type = "Decimal(Some((10, 4)))")]
    pub installment_count_remaining: Decimal,
    pub posted_on: Date,
    pub description: String,
    pub payment_method_id: Option<Uuid>,
    pub payment_method_text: Option<String>,
    pub receipt_ref: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::invoices::Entity",
        from = "Column::InvoiceId",
        to = "super::invoices::Column::Id",
        on_delete = "Cascade"
    )]
    Invoices,
    #[sea_orm(
        belongs_to = "super::payment_methods::Entity",
        from = "Column::PaymentMethodId",
        to = "super::payment_methods::Column::Id"
    )]
    PaymentMethods,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::payment_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Amount columns used for re-aggregation.
    #[must_use]
    pub fn amounts(&self) -> PaymentAmounts {
        PaymentAmounts {
            installment_amount_paid: self.installment_amount_paid,
            extra_payment_amount: self.extra_payment_amount,
            installment_count_paid: self.installment_count_paid,
        }
    }

    /// Money received by this payment.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.installment_amount_paid + self.extra_payment_amount
    }

    /// Payment method reference, if one was recorded.
    #[must_use]
    pub fn method_ref(&self) -> Option<PaymentMethodRef> {
        PaymentMethodRef::from_columns(self.payment_method_id, self.payment_method_text.clone())
    }
}
