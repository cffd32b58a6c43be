use crate::model::RestaurantId;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum DispatchError {
    /// The scheduler has been shut down and accepts no more work.
    #[error("Dispatch scheduler is shut down")]
    ShutDown,

    /// The restaurant's worker queue closed before the bucket could be queued.
    #[error("Worker pool for {0} is closed")]
    PoolClosed(RestaurantId),

    /// A processor reported a failure while preparing a bucket.
    #[error("Processing failed: {0}")]
    Processing(String),
}
