//! # Capacity Cell
//!
//! One actor per restaurant owning that restaurant's processing load. Every reserve and
//! release for the restaurant is a message to this task, so the read-check-write of a
//! reservation can never interleave with another mutation of the same counter. Cells of
//! different restaurants run independently.

use crate::ledger::error::LedgerError;
use crate::ledger::reservation::{Reservation, ReservationId};
use crate::model::RestaurantId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Point-in-time view of a restaurant's capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacitySnapshot {
    pub restaurant_id: RestaurantId,
    pub load: u32,
    pub max_capacity: u32,
    pub is_open: bool,
    /// Reservations granted and not yet released.
    pub outstanding: usize,
}

impl CapacitySnapshot {
    /// Free slots left before the restaurant is full.
    pub fn available(&self) -> u32 {
        self.max_capacity.saturating_sub(self.load)
    }

    /// Whether a new order of `count` items would be admitted right now.
    pub fn can_accept(&self, count: u32) -> bool {
        self.is_open && count <= self.available()
    }
}

pub(crate) enum CellCommand {
    Reserve {
        count: u32,
        respond_to: oneshot::Sender<Result<Reservation, LedgerError>>,
    },
    Release {
        reservation: ReservationId,
        respond_to: oneshot::Sender<bool>,
    },
    ReleaseCount {
        count: u32,
        respond_to: oneshot::Sender<u32>,
    },
    SetOpen {
        open: bool,
        respond_to: oneshot::Sender<()>,
    },
    Snapshot {
        respond_to: oneshot::Sender<CapacitySnapshot>,
    },
}

pub(crate) struct CapacityCell {
    restaurant_id: RestaurantId,
    max_capacity: u32,
    load: u32,
    is_open: bool,
    /// Items still held by each outstanding reservation. Ids grow monotonically, so
    /// iteration order is grant order.
    outstanding: BTreeMap<ReservationId, u32>,
    sequence: Arc<AtomicU64>,
    receiver: mpsc::Receiver<CellCommand>,
}

impl CapacityCell {
    pub(crate) fn new(
        restaurant_id: RestaurantId,
        max_capacity: u32,
        is_open: bool,
        sequence: Arc<AtomicU64>,
        buffer_size: usize,
    ) -> (Self, CellHandle) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let cell = Self {
            restaurant_id,
            max_capacity,
            load: 0,
            is_open,
            outstanding: BTreeMap::new(),
            sequence,
            receiver,
        };
        (cell, CellHandle { restaurant_id, sender })
    }

    fn snapshot(&self) -> CapacitySnapshot {
        CapacitySnapshot {
            restaurant_id: self.restaurant_id,
            load: self.load,
            max_capacity: self.max_capacity,
            is_open: self.is_open,
            outstanding: self.outstanding.len(),
        }
    }

    fn reserve(&mut self, count: u32) -> Result<Reservation, LedgerError> {
        let restaurant_id = self.restaurant_id;
        if count == 0 {
            return Err(LedgerError::EmptyReservation(restaurant_id));
        }
        if !self.is_open {
            return Err(LedgerError::Closed(restaurant_id));
        }
        match self.load.checked_add(count) {
            Some(next) if next <= self.max_capacity => {
                let id = ReservationId(self.sequence.fetch_add(1, Ordering::Relaxed));
                self.load = next;
                self.outstanding.insert(id, count);
                Ok(Reservation::new(id, restaurant_id, count))
            }
            _ => Err(LedgerError::CapacityExceeded {
                restaurant_id,
                requested: count,
                load: self.load,
                max_capacity: self.max_capacity,
            }),
        }
    }

    fn release(&mut self, reservation: ReservationId) -> bool {
        match self.outstanding.remove(&reservation) {
            Some(count) => {
                self.load = self.load.saturating_sub(count);
                true
            }
            None => false,
        }
    }

    /// Lowers the load by `count` without a token.
    ///
    /// The items are taken from the oldest outstanding reservations first; the last one
    /// touched may be left holding only its remainder. Whatever a reservation no longer
    /// holds is not released again when its token comes back.
    fn release_count(&mut self, count: u32) -> u32 {
        let mut remaining = count;
        while remaining > 0 {
            let Some(mut oldest) = self.outstanding.first_entry() else {
                break;
            };
            let held = *oldest.get();
            if held <= remaining {
                oldest.remove();
                remaining -= held;
            } else {
                *oldest.get_mut() = held - remaining;
                remaining = 0;
            }
        }
        self.load = self.load.saturating_sub(count);
        self.load
    }

    pub(crate) async fn run(mut self) {
        let restaurant_id = self.restaurant_id;
        info!(%restaurant_id, max_capacity = self.max_capacity, "Capacity cell started");

        while let Some(command) = self.receiver.recv().await {
            match command {
                CellCommand::Reserve { count, respond_to } => {
                    let result = self.reserve(count);
                    match &result {
                        Ok(reservation) => {
                            info!(%restaurant_id, %reservation, load = self.load, "Reserved")
                        }
                        Err(e) => warn!(%restaurant_id, count, error = %e, "Reservation refused"),
                    }
                    let _ = respond_to.send(result);
                }
                CellCommand::Release {
                    reservation,
                    respond_to,
                } => {
                    let released = self.release(reservation);
                    if released {
                        info!(%restaurant_id, %reservation, load = self.load, "Released");
                    } else {
                        debug!(%restaurant_id, %reservation, "Already released");
                    }
                    let _ = respond_to.send(released);
                }
                CellCommand::ReleaseCount { count, respond_to } => {
                    let load = self.release_count(count);
                    info!(%restaurant_id, count, load, outstanding = self.outstanding.len(), "Released by count");
                    let _ = respond_to.send(load);
                }
                CellCommand::SetOpen { open, respond_to } => {
                    self.is_open = open;
                    info!(%restaurant_id, open, "Open status changed");
                    let _ = respond_to.send(());
                }
                CellCommand::Snapshot { respond_to } => {
                    let _ = respond_to.send(self.snapshot());
                }
            }
        }

        info!(%restaurant_id, load = self.load, outstanding = self.outstanding.len(), "Capacity cell stopped");
    }
}

/// Cloneable sender side of a [`CapacityCell`].
#[derive(Clone)]
pub(crate) struct CellHandle {
    restaurant_id: RestaurantId,
    sender: mpsc::Sender<CellCommand>,
}

impl CellHandle {
    async fn call<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<R>) -> CellCommand,
    ) -> Result<R, LedgerError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| LedgerError::Unavailable(self.restaurant_id))?;
        response
            .await
            .map_err(|_| LedgerError::Unavailable(self.restaurant_id))
    }

    pub(crate) async fn reserve(&self, count: u32) -> Result<Reservation, LedgerError> {
        self.call(|respond_to| CellCommand::Reserve { count, respond_to })
            .await?
    }

    pub(crate) async fn release(&self, reservation: ReservationId) -> Result<bool, LedgerError> {
        self.call(|respond_to| CellCommand::Release {
            reservation,
            respond_to,
        })
        .await
    }

    pub(crate) async fn release_count(&self, count: u32) -> Result<u32, LedgerError> {
        self.call(|respond_to| CellCommand::ReleaseCount { count, respond_to })
            .await
    }

    pub(crate) async fn set_open(&self, open: bool) -> Result<(), LedgerError> {
        self.call(|respond_to| CellCommand::SetOpen { open, respond_to })
            .await
    }

    pub(crate) async fn snapshot(&self) -> Result<CapacitySnapshot, LedgerError> {
        self.call(|respond_to| CellCommand::Snapshot { respond_to })
            .await
    }
}
