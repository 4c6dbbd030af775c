//! Initial database migration.
//!
//! Creates the payment method catalog, invoices and credit payments.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: TABLES
        // ============================================================
        db.execute_unprepared(PAYMENT_METHODS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(CREDIT_PAYMENTS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

const ENUMS_SQL: &str = r"
CREATE TYPE credit_state AS ENUM ('pending', 'paid');
CREATE TYPE delivery_state AS ENUM ('pending', 'accepted', 'rejected');
";

const PAYMENT_METHODS_SQL: &str = r"
CREATE TABLE payment_methods (
    id UUID PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payment_method_name CHECK (btrim(name) <> '')
);

-- Names are unique after trimming, ignoring case
CREATE UNIQUE INDEX idx_payment_methods_name ON payment_methods (lower(btrim(name)));
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    invoice_number VARCHAR(50) NOT NULL UNIQUE,
    issued_on DATE NOT NULL,
    seller VARCHAR(100) NOT NULL,
    customer_dni VARCHAR(20) NOT NULL,
    customer_name VARCHAR(200) NOT NULL,
    total NUMERIC(14, 2) NOT NULL,
    total_with_interest NUMERIC(14, 2) NOT NULL,
    installment_count INTEGER NOT NULL DEFAULT 0,
    installment_amount NUMERIC(14, 2),
    payment_method_id UUID REFERENCES payment_methods(id) ON DELETE RESTRICT,
    payment_method_text VARCHAR(100),
    credit_state credit_state NOT NULL DEFAULT 'pending',
    delivery_state delivery_state NOT NULL DEFAULT 'pending',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_invoice_totals CHECK (total >= 0 AND total_with_interest >= 0),
    CONSTRAINT chk_invoice_installments CHECK (
        installment_count >= 0 AND (installment_amount IS NULL OR installment_amount > 0)
    ),
    -- Exactly one of catalog reference or free text
    CONSTRAINT chk_invoice_method CHECK (
        (payment_method_id IS NULL) <> (payment_method_text IS NULL)
    )
);

CREATE INDEX idx_invoices_issued_on ON invoices(issued_on DESC);
CREATE INDEX idx_invoices_customer_dni ON invoices(customer_dni);
CREATE INDEX idx_invoices_credit_state ON invoices(credit_state);
";

const CREDIT_PAYMENTS_SQL: &str = r"
CREATE TABLE credit_payments (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id) ON DELETE CASCADE,
    installment_amount_paid NUMERIC(14, 2) NOT NULL DEFAULT 0,
    extra_payment_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    installment_count_paid NUMERIC(10, 4) NOT NULL DEFAULT 0,
    installment_count_cumulative NUMERIC(10, 4) NOT NULL DEFAULT 0,
    installment_count_remaining NUMERIC(10, 4) NOT NULL DEFAULT 0,
    posted_on DATE NOT NULL,
    description TEXT NOT NULL,
    payment_method_id UUID REFERENCES payment_methods(id) ON DELETE RESTRICT,
    payment_method_text VARCHAR(100),
    receipt_ref TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payment_amounts CHECK (
        installment_amount_paid >= 0
        AND extra_payment_amount >= 0
        AND installment_amount_paid + extra_payment_amount > 0
    ),
    CONSTRAINT chk_payment_counts CHECK (
        installment_count_paid >= 0
        AND installment_count_cumulative >= 0
        AND installment_count_remaining >= 0
    ),
    -- At most one of catalog reference or free text
    CONSTRAINT chk_payment_method CHECK (
        payment_method_id IS NULL OR payment_method_text IS NULL
    )
);

CREATE INDEX idx_credit_payments_invoice ON credit_payments(invoice_id, posted_on, created_at);
CREATE INDEX idx_credit_payments_posted_on ON credit_payments(posted_on DESC);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS credit_payments CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS payment_methods CASCADE;
DROP TYPE IF EXISTS delivery_state;
DROP TYPE IF EXISTS credit_state;
";
