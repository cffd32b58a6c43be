use thiserror::Error;

/// Errors raised while choosing a restaurant.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SelectionError {
    /// The selector was given no candidates for the named item.
    #[error("No candidate restaurants for {0}")]
    NoCandidates(String),

    /// The strategy name in a request is not recognised.
    #[error("Unknown selection strategy: {0}")]
    UnknownStrategy(String),
}
