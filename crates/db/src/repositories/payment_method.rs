//! Payment method catalog repository.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};
use tracing::info;
use uuid::Uuid;

use backoffice_core::credit::{
    CreditError, PaymentMethodRef, ResolvedMethod, check_method_name, normalize_label,
};
use backoffice_shared::types::PaymentMethodId;

use super::error::{RepositoryError, is_unique_violation};
use crate::entities::payment_methods;

/// Catalog names keyed by method ID.
pub type MethodNames = HashMap<PaymentMethodId, String>;

/// Repository for the payment method catalog.
#[derive(Debug, Clone)]
pub struct PaymentMethodRepository {
    db: DatabaseConnection,
}

impl PaymentMethodRepository {
    /// Creates a new payment method repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a method to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, already used (ignoring case
    /// and surrounding spaces), or the database query fails.
    pub async fn create(&self, name: &str) -> Result<payment_methods::Model, RepositoryError> {
        check_method_name(name)?;
        let name = name.trim();
        let normalized = normalize_label(name);

        let existing = payment_methods::Entity::find()
            .filter(Expr::cust_with_values(
                "lower(btrim(name)) = $1",
                [normalized.clone()],
            ))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(CreditError::DuplicatePaymentMethod(name.to_string()).into());
        }

        let now = Utc::now().into();
        let method = payment_methods::ActiveModel {
            id: Set(PaymentMethodId::new().into_inner()),
            name: Set(name.to_string()),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let method = method.insert(&self.db).await.map_err(|err| {
            if is_unique_violation(&err) {
                RepositoryError::from(CreditError::DuplicatePaymentMethod(name.to_string()))
            } else {
                RepositoryError::from(err)
            }
        })?;

        info!(method_id = %method.id, name = %method.name, "Payment method created");
        Ok(method)
    }

    /// Lists the catalog ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, active_only: bool) -> Result<Vec<payment_methods::Model>, DbErr> {
        let mut query = payment_methods::Entity::find().order_by_asc(payment_methods::Column::Name);
        if active_only {
            query = query.filter(payment_methods::Column::IsActive.eq(true));
        }
        query.all(&self.db).await
    }

    /// Finds a catalog entry by ID, active or not.
    ///
    /// # Errors
    ///
    /// Returns `PaymentMethodNotFound` if the entry does not exist, or a database error.
    pub async fn get(&self, id: Uuid) -> Result<payment_methods::Model, RepositoryError> {
        let method = payment_methods::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::PaymentMethodNotFound(id))?;
        Ok(method)
    }

    /// Loads every catalog name, keyed by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn names<C: ConnectionTrait>(conn: &C) -> Result<MethodNames, DbErr> {
        let methods = payment_methods::Entity::find().all(conn).await?;
        Ok(methods
            .into_iter()
            .map(|m| (PaymentMethodId::from_uuid(m.id), m.name))
            .collect())
    }

    /// Resolves a reference for a new invoice or payment.
    ///
    /// Catalog references must point to an active entry.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMethod` if the reference cannot be resolved, or a
    /// database error.
    pub async fn resolve<C: ConnectionTrait>(
        conn: &C,
        reference: PaymentMethodRef,
    ) -> Result<ResolvedMethod, RepositoryError> {
        let known = match &reference {
            PaymentMethodRef::Known(id) => payment_methods::Entity::find_by_id(id.into_inner())
                .filter(payment_methods::Column::IsActive.eq(true))
                .one(conn)
                .await?
                .map(|m| (*id, m.name)),
            PaymentMethodRef::Manual(_) => None,
        };

        let resolved = ResolvedMethod::resolve(reference, |id| {
            known
                .as_ref()
                .filter(|(known_id, _)| *known_id == id)
                .map(|(_, name)| name.clone())
        })?;
        Ok(resolved)
    }
}
