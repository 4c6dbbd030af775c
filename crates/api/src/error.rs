//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

use backoffice_core::credit::CreditError;
use backoffice_db::RepositoryError;
use backoffice_shared::AppError;

/// An error rendered as `{ "error": <CODE>, "message": <text> }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Creates a 400 error.
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            message: message.into(),
        }
    }

    /// HTTP status of the error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Stable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

impl From<CreditError> for ApiError {
    fn from(err: CreditError) -> Self {
        let status = StatusCode::from_u16(err.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if status.is_server_error() {
            error!(error = %err, "Request failed");
            "An error occurred".to_string()
        } else {
            err.to_string()
        };
        Self {
            status,
            code: err.error_code(),
            message,
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        err.into_credit_error().into()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(error = %err, "Request failed");
        }
        Self {
            status,
            code: err.error_code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({
                "error": self.code,
                "message": self.message,
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_overpayment_maps_to_422() {
        let err: ApiError = CreditError::Overpayment {
            attempted: dec!(10),
            outstanding: dec!(5),
        }
        .into();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "OVERPAYMENT");
    }

    #[test]
    fn test_database_error_hides_details() {
        let err: ApiError =
            RepositoryError::Database(sea_orm::DbErr::Custom("password=secret".into())).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(!err.message.contains("secret"));
    }

    #[test]
    fn test_not_found() {
        let err: ApiError = CreditError::InvoiceNotFound(Uuid::nil()).into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
