//! Error types for the inventory ledger.

use crate::model::ItemCode;
use keyed_actor::FrameworkError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by every inventory operation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InventoryError {
    /// No item carries this code. Retrying will not help.
    #[error("Item not found: {0}")]
    NotFound(ItemCode),

    /// A withdrawal asked for more than is on hand. Nothing was withdrawn.
    #[error("Insufficient stock for item {code}: requested {requested}, available {available}")]
    InsufficientStock {
        code: ItemCode,
        requested: Decimal,
        available: Decimal,
    },

    /// The request was rejected before anything was written.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The write did not complete and was rolled back. The whole operation may be retried.
    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl InventoryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        InventoryError::InvalidInput(reason.into())
    }

    /// Maps a runtime error for the item `code` to the ledger's error type.
    ///
    /// Domain errors raised inside the item actor come back unchanged.
    pub fn from_framework(code: Option<ItemCode>, error: FrameworkError) -> Self {
        let error = match error.into_entity_error::<InventoryError>() {
            Ok(domain) => return domain,
            Err(other) => other,
        };
        match error {
            FrameworkError::NotFound(raw) => match code.or_else(|| raw.parse().ok().map(ItemCode)) {
                Some(code) => InventoryError::NotFound(code),
                None => InventoryError::InvalidInput(format!("unknown item {raw}")),
            },
            FrameworkError::Conflict(raw) => {
                InventoryError::InvalidInput(format!("item code {raw} is already in use"))
            }
            FrameworkError::Exhausted => {
                InventoryError::invalid("no item codes left; supply an explicit code")
            }
            FrameworkError::Storage(e) => InventoryError::StorageFailure(e.to_string()),
            other => InventoryError::StorageFailure(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyed_actor::StoreError;

    #[test]
    fn test_domain_errors_pass_through() {
        let refusal = InventoryError::invalid("name must not be empty");
        let boxed = FrameworkError::EntityError(Box::new(refusal.clone()));
        assert_eq!(InventoryError::from_framework(None, boxed), refusal);
    }

    #[test]
    fn test_runtime_errors_are_classified() {
        let code = ItemCode(9);
        assert_eq!(
            InventoryError::from_framework(Some(code), FrameworkError::NotFound("9".into())),
            InventoryError::NotFound(code)
        );
        assert_eq!(
            InventoryError::from_framework(None, FrameworkError::NotFound("9".into())),
            InventoryError::NotFound(code)
        );
        assert!(matches!(
            InventoryError::from_framework(None, FrameworkError::Conflict("9".into())),
            InventoryError::InvalidInput(_)
        ));
        assert!(matches!(
            InventoryError::from_framework(
                Some(code),
                FrameworkError::Storage(StoreError::Unavailable("disk full".into()))
            ),
            InventoryError::StorageFailure(_)
        ));
        assert!(matches!(
            InventoryError::from_framework(None, FrameworkError::Exhausted),
            InventoryError::InvalidInput(_)
        ));
        assert!(matches!(
            InventoryError::from_framework(Some(code), FrameworkError::ActorClosed),
            InventoryError::StorageFailure(_)
        ));
    }
}
