//! Error type shared by the typed store clients.

use crate::framework::FrameworkError;
use thiserror::Error;

/// Errors returned by the restaurant, menu, customer and order stores.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The store refused the payload.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// The store actor is gone or dropped the request.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for StoreError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::NotFound(id) => StoreError::NotFound(id),
            FrameworkError::Rejected(reason) => StoreError::Rejected(reason.to_string()),
            other @ (FrameworkError::ActorClosed | FrameworkError::ActorDropped) => {
                StoreError::Unavailable(other.to_string())
            }
        }
    }
}
