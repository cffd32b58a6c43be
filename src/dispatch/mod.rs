//! # Dispatch Scheduler
//!
//! Hands admitted buckets to restaurant kitchens. Each active restaurant gets a worker
//! pool with one worker per unit of `max_capacity`. A submitted bucket is
//! released back to the [`CapacityLedger`] twice over:
//!
//! - by the worker, once the [`BucketProcessor`] returns (or fails, or panics);
//! - by a deadline timer armed at submit, after the preparation time.
//!
//! Both paths hold copies of the same [`Reservation`], and the ledger honours only the
//! first release, so the load drops exactly once per bucket whichever path wins.

pub mod error;
mod pool;
pub mod processor;

pub use error::DispatchError;
pub use processor::{BucketProcessor, PreparationProcessor};

use crate::ledger::{CapacityLedger, Reservation};
use crate::model::{OrderItemRequest, RestaurantId};
use dashmap::DashMap;
use pool::{BucketJob, WorkerPool};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

pub struct DispatchScheduler {
    ledger: Arc<CapacityLedger>,
    processor: Arc<dyn BucketProcessor>,
    preparation_time: Duration,
    buffer_size: usize,
    pools: DashMap<RestaurantId, WorkerPool>,
    stopped: watch::Sender<bool>,
}

impl DispatchScheduler {
    pub fn new(
        ledger: Arc<CapacityLedger>,
        processor: Arc<dyn BucketProcessor>,
        preparation_time: Duration,
        buffer_size: usize,
    ) -> Self {
        let (stopped, _) = watch::channel(false);
        Self {
            ledger,
            processor,
            preparation_time,
            buffer_size,
            pools: DashMap::new(),
            stopped,
        }
    }

    /// Starts the worker pool of a restaurant. A restaurant that already has a pool
    /// keeps it.
    pub fn activate(&self, restaurant_id: RestaurantId, max_capacity: u32) {
        self.pools.entry(restaurant_id).or_insert_with(|| {
            WorkerPool::spawn(
                restaurant_id,
                (max_capacity as usize).max(1),
                self.buffer_size,
                self.ledger.clone(),
                self.processor.clone(),
            )
        });
    }

    pub fn pool_size(&self, restaurant_id: RestaurantId) -> Option<usize> {
        self.pools.get(&restaurant_id).map(|pool| pool.size())
    }

    /// Queues a bucket for preparation and arms its deadline timer.
    ///
    /// The restaurant's pool is started on first use, sized from the ledger's
    /// `max_capacity`. If the bucket cannot be queued the reservation is released
    /// before the error is returned.
    #[instrument(skip(self, reservation, items), fields(%reservation, items = items.len()))]
    pub async fn submit(
        &self,
        reservation: Reservation,
        items: Vec<OrderItemRequest>,
    ) -> Result<(), DispatchError> {
        if *self.stopped.borrow() {
            self.ledger.release(&reservation).await;
            return Err(DispatchError::ShutDown);
        }

        let restaurant_id = reservation.restaurant_id();
        if !self.pools.contains_key(&restaurant_id) {
            match self.ledger.snapshot(restaurant_id).await {
                Ok(snapshot) => self.activate(restaurant_id, snapshot.max_capacity),
                Err(e) => warn!(error = %e, "Cannot size worker pool"),
            }
        }
        let sender = self
            .pools
            .get(&restaurant_id)
            .map(|pool| pool.sender())
            .ok_or(DispatchError::PoolClosed(restaurant_id));

        self.arm_deadline(reservation.clone());

        let job = BucketJob {
            reservation: reservation.clone(),
            items,
        };
        let queued = match sender {
            Ok(sender) => sender
                .send(job)
                .await
                .map_err(|_| DispatchError::PoolClosed(restaurant_id)),
            Err(e) => Err(e),
        };
        if let Err(e) = queued {
            warn!(error = %e, "Bucket not queued");
            self.ledger.release(&reservation).await;
            return Err(e);
        }
        info!("Bucket dispatched");
        Ok(())
    }

    fn arm_deadline(&self, reservation: Reservation) {
        let ledger = self.ledger.clone();
        let deadline = self.preparation_time;
        let mut stopped = self.stopped.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(deadline) => {
                    if ledger.release(&reservation).await {
                        info!(%reservation, "Preparation deadline released capacity");
                    }
                }
                _ = stopped.changed() => {
                    debug!(%reservation, "Deadline timer cancelled");
                }
            }
        });
    }

    /// Stops a restaurant's pool. Buckets already queued are still prepared.
    pub fn retire(&self, restaurant_id: RestaurantId) -> bool {
        match self.pools.remove(&restaurant_id) {
            Some((_, pool)) => {
                tokio::spawn(pool.close(restaurant_id));
                true
            }
            None => false,
        }
    }

    /// Cancels all deadline timers, closes every queue and waits for the workers to
    /// finish the buckets already queued. Later submits fail with
    /// [`DispatchError::ShutDown`].
    pub async fn shutdown(&self) {
        self.stopped.send_replace(true);
        let ids: Vec<RestaurantId> = self.pools.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Some((_, pool)) = self.pools.remove(&id) {
                pool.close(id).await;
            }
        }
        info!("Dispatch scheduler shut down");
    }
}
