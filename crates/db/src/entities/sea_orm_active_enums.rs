//! `SeaORM` active enums mapped to `PostgreSQL` enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use backoffice_core::credit;

/// `credit_state` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "credit_state")]
pub enum CreditState {
    /// Balance outstanding.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Paid in full.
    #[sea_orm(string_value = "paid")]
    Paid,
}

/// `delivery_state` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "delivery_state")]
pub enum DeliveryState {
    /// Not yet delivered.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Accepted by the customer.
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Rejected by the customer.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<credit::CreditState> for CreditState {
    fn from(state: credit::CreditState) -> Self {
        match state {
            credit::CreditState::Pending => Self::Pending,
            credit::CreditState::Paid => Self::Paid,
        }
    }
}

impl From<CreditState> for credit::CreditState {
    fn from(state: CreditState) -> Self {
        match state {
            CreditState::Pending => Self::Pending,
            CreditState::Paid => Self::Paid,
        }
    }
}

impl From<credit::DeliveryState> for DeliveryState {
    fn from(state: credit::DeliveryState) -> Self {
        match state {
            credit::DeliveryState::Pending => Self::Pending,
            credit::DeliveryState::Accepted => Self::Accepted,
            credit::DeliveryState::Rejected => Self::Rejected,
        }
    }
}

impl From<DeliveryState> for credit::DeliveryState {
    fn from(state: DeliveryState) -> Self {
        match state {
            DeliveryState::Pending => Self::Pending,
            DeliveryState::Accepted => Self::Accepted,
            DeliveryState::Rejected => Self::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_state_round_trip() {
        for state in [credit::CreditState::Pending, credit::CreditState::Paid] {
            let db: CreditState = state.into();
            assert_eq!(credit::CreditState::from(db), state);
        }
    }

    #[test]
    fn test_delivery_state_values() {
        assert_eq!(DeliveryState::Accepted.to_value(), "accepted");
        assert_eq!(
            DeliveryState::from(credit::DeliveryState::Rejected),
            DeliveryState::Rejected
        );
    }
}
