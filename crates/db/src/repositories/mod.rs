//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod accounts;
pub mod cash_close;
pub mod credit;
pub mod error;
pub mod invoice;
pub mod payment_method;

pub use accounts::AccountsRepository;
pub use cash_close::CashCloseRepository;
pub use credit::{CreditRepository, PaymentView, RecordedPayment};
pub use error::RepositoryError;
pub use invoice::{CreateInvoiceInput, InvoiceFilter, InvoiceRepository, InvoiceView};
pub use payment_method::{MethodNames, PaymentMethodRepository};
