//! Fixed-size worker pool for one restaurant.
//!
//! All workers pull from one bounded queue, so at most `size` buckets of the restaurant
//! are in preparation at once and the rest wait in arrival order.

use crate::dispatch::processor::BucketProcessor;
use crate::ledger::{CapacityLedger, Reservation};
use crate::model::{OrderItemRequest, RestaurantId};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// A bucket waiting for a worker.
#[derive(Debug)]
pub(crate) struct BucketJob {
    pub(crate) reservation: Reservation,
    pub(crate) items: Vec<OrderItemRequest>,
}

pub(crate) struct WorkerPool {
    sender: mpsc::Sender<BucketJob>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub(crate) fn spawn(
        restaurant_id: RestaurantId,
        size: usize,
        buffer: usize,
        ledger: Arc<CapacityLedger>,
        processor: Arc<dyn BucketProcessor>,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(buffer);
        let queue = Arc::new(Mutex::new(receiver));
        let workers = (0..size)
            .map(|worker| {
                tokio::spawn(run_worker(
                    restaurant_id,
                    worker,
                    queue.clone(),
                    ledger.clone(),
                    processor.clone(),
                ))
            })
            .collect();
        info!(%restaurant_id, workers = size, "Worker pool started");
        Self { sender, workers }
    }

    pub(crate) fn size(&self) -> usize {
        self.workers.len()
    }

    pub(crate) fn sender(&self) -> mpsc::Sender<BucketJob> {
        self.sender.clone()
    }

    /// Closes the queue and waits for the workers to finish what is already queued.
    pub(crate) async fn close(self, restaurant_id: RestaurantId) {
        drop(self.sender);
        for worker in self.workers {
            if let Err(e) = worker.await {
                warn!(%restaurant_id, error = %e, "Worker task failed");
            }
        }
        info!(%restaurant_id, "Worker pool stopped");
    }
}

async fn run_worker(
    restaurant_id: RestaurantId,
    worker: usize,
    queue: Arc<Mutex<mpsc::Receiver<BucketJob>>>,
    ledger: Arc<CapacityLedger>,
    processor: Arc<dyn BucketProcessor>,
) {
    loop {
        // The lock is held only while waiting for the next job.
        let job = queue.lock().await.recv().await;
        let Some(BucketJob { reservation, items }) = job else {
            break;
        };

        debug!(%restaurant_id, worker, %reservation, "Bucket picked up");
        let task = {
            let processor = processor.clone();
            tokio::spawn(async move { processor.process(restaurant_id, &items).await })
        };
        match task.await {
            Ok(Ok(())) => info!(%restaurant_id, %reservation, "Bucket prepared"),
            Ok(Err(e)) => error!(%restaurant_id, %reservation, error = %e, "Bucket processing failed"),
            Err(e) => error!(%restaurant_id, %reservation, error = %e, "Bucket processing panicked"),
        }

        if ledger.release(&reservation).await {
            debug!(%restaurant_id, %reservation, "Worker released capacity");
        }
    }
    debug!(%restaurant_id, worker, "Worker stopped");
}
