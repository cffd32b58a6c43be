//! Reservation tokens.

use crate::model::RestaurantId;
use serde::Serialize;
use std::fmt::Display;

/// Sequence number of a reservation, unique across the whole ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ReservationId(pub u64);

impl Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rsv_{}", self.0)
    }
}

/// Capacity granted by the ledger and not yet given back.
///
/// Copies of a reservation may be handed to several release paths (bucket worker,
/// deadline timer). The owning cell records which reservations are outstanding, so only
/// the first [`CapacityLedger::release`](crate::ledger::CapacityLedger::release) of a
/// given reservation changes the load; later ones are no-ops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reservation {
    id: ReservationId,
    restaurant_id: RestaurantId,
    count: u32,
}

impl Reservation {
    pub(crate) fn new(id: ReservationId, restaurant_id: RestaurantId, count: u32) -> Self {
        Self {
            id,
            restaurant_id,
            count,
        }
    }

    pub fn id(&self) -> ReservationId {
        self.id
    }

    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant_id
    }

    /// Number of items this reservation holds.
    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Display for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}x{}", self.restaurant_id, self.id, self.count)
    }
}
