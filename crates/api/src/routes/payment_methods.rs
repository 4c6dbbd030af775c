//! Payment method catalog routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_core::credit::{CreditError, PaymentMethodRef, check_method_name};
use backoffice_db::{PaymentMethodRepository, entities::payment_methods};
use backoffice_shared::types::PaymentMethodId;

use crate::{AppState, error::ApiError};

/// Creates the payment method routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payment-methods", get(list_methods).post(create_method))
        .route("/payment-methods/{id}", get(get_method))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing payment methods.
#[derive(Debug, Deserialize)]
pub struct ListMethodsQuery {
    /// Include inactive entries.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for creating a payment method.
#[derive(Debug, Deserialize)]
pub struct CreateMethodRequest {
    /// Display name.
    pub name: String,
}

/// Response for a payment method.
#[derive(Debug, Serialize)]
pub struct MethodResponse {
    /// Method ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Whether new invoices and payments may use it.
    pub is_active: bool,
}

impl From<payment_methods::Model> for MethodResponse {
    fn from(model: payment_methods::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            is_active: model.is_active,
        }
    }
}

/// Builds a method reference from the two request fields.
///
/// At most one of them may be given, and free text must fit the column.
pub(crate) fn method_ref(
    id: Option<Uuid>,
    text: Option<String>,
) -> Result<Option<PaymentMethodRef>, CreditError> {
    match (id, text) {
        (Some(_), Some(_)) => Err(CreditError::InvalidMethod(
            "give either payment_method_id or payment_method, not both".to_string(),
        )),
        (Some(id), None) => Ok(Some(PaymentMethodRef::Known(PaymentMethodId::from_uuid(id)))),
        (None, Some(text)) => {
            check_method_name(&text)?;
            Ok(Some(PaymentMethodRef::Manual(text)))
        }
        (None, None) => Ok(None),
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/payment-methods` - List the catalog.
async fn list_methods(
    State(state): State<AppState>,
    Query(query): Query<ListMethodsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PaymentMethodRepository::new((*state.db).clone());
    let methods: Vec<MethodResponse> = repo
        .list(!query.include_inactive)
        .await
        .map_err(backoffice_db::RepositoryError::from)?
        .into_iter()
        .map(MethodResponse::from)
        .collect();

    Ok(Json(methods))
}

/// GET `/payment-methods/{id}` - Get a catalog entry.
async fn get_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PaymentMethodRepository::new((*state.db).clone());
    let method = repo.get(id).await?;
    Ok(Json(MethodResponse::from(method)))
}

/// POST `/payment-methods` - Add a catalog entry.
async fn create_method(
    State(state): State<AppState>,
    Json(payload): Json<CreateMethodRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = PaymentMethodRepository::new((*state.db).clone());
    let method = repo.create(&payload.name).await?;
    Ok((StatusCode::CREATED, Json(MethodResponse::from(method))))
}
