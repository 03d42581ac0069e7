//! Error types for the cart store.
//!
//! Two families exist and they travel differently:
//!
//! - [`CartError`] is returned as `Err` from mutators. It always means the
//!   caller passed input the cart refuses, and the cart was left untouched.
//! - [`PersistenceError`] never escapes as `Err`. A failed save or restore is
//!   logged and reported through [`Commit::Unsaved`](crate::Commit) or the
//!   [`RestoreReport`](crate::RestoreReport), while the in-memory cart keeps
//!   working.

use basket_core::{ProductId, QuantityError};
use thiserror::Error;

use crate::storage::StorageError;

/// Mutation input the cart refuses (the invalid-argument class).
///
/// Ids and prices are checked when a [`NewCartLine`](basket_core::NewCartLine)
/// is built, so only quantities can still be refused here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The quantity cannot be applied to the line.
    #[error("Invalid quantity for {id}: {source}")]
    InvalidQuantity {
        /// Line the quantity was meant for.
        id: ProductId,
        /// Why the quantity was refused.
        source: QuantityError,
    },
}

/// Saving or restoring the cart failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The session storage backend failed.
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("Failed to encode cart: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored blob is not a JSON object of cart records.
    #[error("Stored cart is corrupt: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result type alias for cart mutations.
pub type Result<T> = std::result::Result<T, CartError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_error_display() {
        let err = CartError::InvalidQuantity {
            id: ProductId::parse("p1").unwrap(),
            source: QuantityError::Negative(-3),
        };
        assert_eq!(
            err.to_string(),
            "Invalid quantity for p1: quantity cannot be negative: -3"
        );

        let err = CartError::InvalidQuantity {
            id: ProductId::parse("p1").unwrap(),
            source: QuantityError::Overflow,
        };
        assert!(err.to_string().starts_with("Invalid quantity for p1: "));
    }

    #[test]
    fn test_persistence_error_display() {
        let err = PersistenceError::from(StorageError::Disabled);
        assert_eq!(
            err.to_string(),
            "Session storage error: session storage is disabled"
        );

        let decode = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = PersistenceError::Decode(decode);
        assert!(err.to_string().starts_with("Stored cart is corrupt"));
    }
}
