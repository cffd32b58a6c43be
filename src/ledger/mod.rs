//! # Capacity Ledger
//!
//! Admission control for restaurant kitchens. The ledger keeps one
//! [`CapacityCell`](cell) actor per active restaurant; the cell owns the restaurant's
//! processing load, its open flag and the set of outstanding [`Reservation`]s.
//!
//! ## Guarantees
//!
//! - `reserve(r, n)` either raises the load by exactly `n` or leaves it untouched.
//! - The load never exceeds `max_capacity` and never drops below zero.
//! - A reservation changes the load on its first release only; every later release of
//!   the same reservation (worker completion racing a deadline timer) is a no-op.
//! - Cells for different restaurants never wait on each other.
//!
//! ## Lifecycle
//!
//! Cells are created by [`CapacityLedger::register`] when a restaurant is activated,
//! removed by [`CapacityLedger::retire`], and all stopped by
//! [`CapacityLedger::shutdown`].

mod cell;
pub mod error;
pub mod reservation;

pub use cell::CapacitySnapshot;
pub use error::LedgerError;
pub use reservation::{Reservation, ReservationId};

use crate::model::{Restaurant, RestaurantId};
use cell::{CapacityCell, CellHandle};
use dashmap::DashMap;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

struct CellEntry {
    handle: CellHandle,
    task: JoinHandle<()>,
}

/// Registry of per-restaurant capacity cells.
pub struct CapacityLedger {
    cells: DashMap<RestaurantId, CellEntry>,
    /// Shared by every cell, so a token from a retired cell never matches a
    /// reservation of the cell that replaced it.
    sequence: Arc<AtomicU64>,
    buffer_size: usize,
}

impl CapacityLedger {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            cells: DashMap::new(),
            sequence: Arc::new(AtomicU64::new(1)),
            buffer_size,
        }
    }

    /// Activates a cell for `restaurant` with zero load.
    ///
    /// Registering an already active restaurant keeps the existing cell and its load.
    #[instrument(skip(self, restaurant), fields(restaurant_id = %restaurant.id))]
    pub fn register(&self, restaurant: &Restaurant) {
        self.cells.entry(restaurant.id).or_insert_with(|| {
            let (cell, handle) = CapacityCell::new(
                restaurant.id,
                restaurant.max_capacity,
                restaurant.is_open,
                self.sequence.clone(),
                self.buffer_size,
            );
            let task = tokio::spawn(cell.run());
            info!(max_capacity = restaurant.max_capacity, "Registered");
            CellEntry { handle, task }
        });
    }

    pub fn is_registered(&self, restaurant_id: RestaurantId) -> bool {
        self.cells.contains_key(&restaurant_id)
    }

    fn handle(&self, restaurant_id: RestaurantId) -> Result<CellHandle, LedgerError> {
        // Clone out so the map guard is released before any await.
        self.cells
            .get(&restaurant_id)
            .map(|entry| entry.handle.clone())
            .ok_or(LedgerError::NotFound(restaurant_id))
    }

    /// Atomically claims `count` items of capacity.
    ///
    /// Fails with [`LedgerError::Closed`] when the restaurant is closed and with
    /// [`LedgerError::CapacityExceeded`] when `load + count > max_capacity`; in both
    /// cases the load is unchanged.
    pub async fn reserve(
        &self,
        restaurant_id: RestaurantId,
        count: u32,
    ) -> Result<Reservation, LedgerError> {
        self.handle(restaurant_id)?.reserve(count).await
    }

    /// Gives a reservation back. Returns `true` if this call released it.
    ///
    /// Never fails: releasing against a retired or stopped cell is logged and reported
    /// as `false`.
    pub async fn release(&self, reservation: &Reservation) -> bool {
        let handle = match self.handle(reservation.restaurant_id()) {
            Ok(handle) => handle,
            Err(e) => {
                warn!(%reservation, error = %e, "Release skipped");
                return false;
            }
        };
        match handle.release(reservation.id()).await {
            Ok(released) => released,
            Err(e) => {
                warn!(%reservation, error = %e, "Release skipped");
                false
            }
        }
    }

    /// Lowers the load by `count` without a token, saturating at zero, and returns the
    /// resulting load.
    ///
    /// The released items are taken out of the oldest outstanding reservations, so a
    /// later token release of the same work does not lower the load a second time.
    pub async fn release_count(
        &self,
        restaurant_id: RestaurantId,
        count: u32,
    ) -> Result<u32, LedgerError> {
        self.handle(restaurant_id)?.release_count(count).await
    }

    pub async fn current_load(&self, restaurant_id: RestaurantId) -> Result<u32, LedgerError> {
        Ok(self.snapshot(restaurant_id).await?.load)
    }

    /// Whether `count` more items would be admitted right now. Advisory only: use
    /// [`reserve`](Self::reserve) to actually claim capacity.
    pub async fn can_accept(
        &self,
        restaurant_id: RestaurantId,
        count: u32,
    ) -> Result<bool, LedgerError> {
        Ok(self.snapshot(restaurant_id).await?.can_accept(count))
    }

    pub async fn snapshot(&self, restaurant_id: RestaurantId) -> Result<CapacitySnapshot, LedgerError> {
        self.handle(restaurant_id)?.snapshot().await
    }

    pub async fn set_open(&self, restaurant_id: RestaurantId, open: bool) -> Result<(), LedgerError> {
        self.handle(restaurant_id)?.set_open(open).await
    }

    /// Deactivates a restaurant. New reservations fail with `NotFound` and releases of
    /// reservations still in flight become no-ops.
    #[instrument(skip(self))]
    pub fn retire(&self, restaurant_id: RestaurantId) -> bool {
        let removed = self.cells.remove(&restaurant_id).is_some();
        if removed {
            info!("Retired");
        }
        removed
    }

    /// Stops every cell and waits for the cell tasks to finish.
    ///
    /// Callers must stop whatever else holds reservations (the dispatch scheduler)
    /// first, or this waits for those holders to let go.
    pub async fn shutdown(&self) {
        let ids: Vec<RestaurantId> = self.cells.iter().map(|entry| *entry.key()).collect();
        for id in ids {
            if let Some((_, CellEntry { handle, task })) = self.cells.remove(&id) {
                drop(handle);
                if let Err(e) = task.await {
                    warn!(restaurant_id = %id, error = %e, "Capacity cell task failed");
                }
            }
        }
        info!("Capacity ledger shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn restaurant(id: u32, max: u32) -> Restaurant {
        Restaurant {
            id: RestaurantId(id),
            name: format!("R{id}"),
            address: String::new(),
            cuisine_type: None,
            rating: Decimal::from(4),
            is_open: true,
            max_capacity: max,
        }
    }

    #[tokio::test]
    async fn test_unknown_restaurant_is_not_found() {
        let ledger = CapacityLedger::new(8);
        assert_eq!(
            ledger.reserve(RestaurantId(7), 1).await,
            Err(LedgerError::NotFound(RestaurantId(7)))
        );
        assert!(ledger.current_load(RestaurantId(7)).await.is_err());
    }

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let ledger = CapacityLedger::new(8);
        let r = restaurant(1, 5);
        ledger.register(&r);
        ledger.reserve(r.id, 2).await.unwrap();
        ledger.register(&r);
        assert_eq!(ledger.current_load(r.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_release_after_retire_is_noop() {
        let ledger = CapacityLedger::new(8);
        let r = restaurant(1, 5);
        ledger.register(&r);
        let reservation = ledger.reserve(r.id, 2).await.unwrap();

        assert!(ledger.retire(r.id));
        assert!(!ledger.release(&reservation).await);
        assert!(!ledger.is_registered(r.id));
    }

    #[tokio::test]
    async fn test_release_count_saturates() {
        let ledger = CapacityLedger::new(8);
        let r = restaurant(1, 5);
        ledger.register(&r);
        ledger.reserve(r.id, 2).await.unwrap();

        assert_eq!(ledger.release_count(r.id, 1).await.unwrap(), 1);
        assert_eq!(ledger.release_count(r.id, 10).await.unwrap(), 0);
        assert_eq!(ledger.release_count(r.id, 10).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_stops_cells() {
        let ledger = CapacityLedger::new(8);
        ledger.register(&restaurant(1, 5));
        ledger.register(&restaurant(2, 5));
        ledger.shutdown().await;
        assert!(!ledger.is_registered(RestaurantId(1)));
        assert_eq!(
            ledger.reserve(RestaurantId(2), 1).await,
            Err(LedgerError::NotFound(RestaurantId(2)))
        );
    }

    #[tokio::test]
    async fn test_stale_token_does_not_touch_new_cell() {
        let ledger = CapacityLedger::new(8);
        let r = restaurant(1, 5);
        ledger.register(&r);
        let stale = ledger.reserve(r.id, 2).await.unwrap();

        ledger.retire(r.id);
        ledger.register(&r);
        let fresh = ledger.reserve(r.id, 4).await.unwrap();

        assert_ne!(stale.id(), fresh.id());
        assert!(!ledger.release(&stale).await);
        assert_eq!(ledger.current_load(r.id).await.unwrap(), 4);
    }
}
