//! `SeaORM` entity definitions.

pub mod credit_payments;
pub mod invoices;
pub mod payment_methods;
pub mod sea_orm_active_enums;
