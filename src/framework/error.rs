//! # Store Errors
//!
//! Errors raised by the store actors and their clients.

/// Errors that can occur while talking to a store actor.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Store actor closed")]
    ActorClosed,
    #[error("Store actor dropped response channel")]
    ActorDropped,
    #[error("Record not found: {0}")]
    NotFound(String),
    #[error("Rejected record: {0}")]
    Rejected(Box<dyn std::error::Error + Send + Sync>),
}
