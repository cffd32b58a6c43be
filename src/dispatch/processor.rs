//! Kitchen work performed for a dispatched bucket.

use crate::dispatch::error::DispatchError;
use crate::model::{OrderItemRequest, RestaurantId};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Work done by a restaurant worker for one bucket of items.
///
/// The worker releases the bucket's reservation after `process` returns, whether it
/// returned an error or panicked.
#[async_trait]
pub trait BucketProcessor: Send + Sync + 'static {
    async fn process(
        &self,
        restaurant_id: RestaurantId,
        items: &[OrderItemRequest],
    ) -> Result<(), DispatchError>;
}

/// Default processor: announces every item and then simulates preparation time.
#[derive(Debug, Clone)]
pub struct PreparationProcessor {
    work_time: Duration,
}

impl PreparationProcessor {
    pub fn new(work_time: Duration) -> Self {
        Self { work_time }
    }
}

#[async_trait]
impl BucketProcessor for PreparationProcessor {
    async fn process(
        &self,
        restaurant_id: RestaurantId,
        items: &[OrderItemRequest],
    ) -> Result<(), DispatchError> {
        for item in items {
            info!(%restaurant_id, item = %item.name, quantity = item.quantity, "Preparing");
        }
        tokio::time::sleep(self.work_time).await;
        Ok(())
    }
}
