//! Validation errors raised when a record payload is rejected.

use thiserror::Error;

/// Reasons a store refuses to save or update a record.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("max capacity must be positive")]
    ZeroCapacity,

    #[error("rating {0} is outside 0..=5")]
    RatingOutOfRange(rust_decimal::Decimal),

    #[error("price {0} must be positive")]
    NonPositivePrice(rust_decimal::Decimal),

    #[error("quantity must be at least 1")]
    ZeroQuantity,
}
