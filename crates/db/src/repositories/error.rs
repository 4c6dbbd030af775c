//! Repository error type.

use sea_orm::{DbErr, SqlErr};

use backoffice_core::credit::CreditError;

/// Errors returned by the repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// A business rule rejected the operation.
    #[error(transparent)]
    Credit(#[from] CreditError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// Converts the error into a [`CreditError`] for the API layer.
    #[must_use]
    pub fn into_credit_error(self) -> CreditError {
        match self {
            Self::Credit(err) => err,
            Self::Database(err) => CreditError::Database(err.to_string()),
        }
    }
}

/// Returns true if the error is a unique constraint violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
