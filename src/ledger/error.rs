//! Error types for the capacity ledger.

use crate::model::RestaurantId;
use thiserror::Error;

/// Reasons a reservation or ledger query can fail.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    /// The restaurant has no active cell in the ledger.
    #[error("Restaurant not found: {0}")]
    NotFound(RestaurantId),

    /// The restaurant is not accepting orders.
    #[error("Restaurant {0} is closed")]
    Closed(RestaurantId),

    /// Reserving would push the load above the maximum capacity.
    #[error("Capacity exceeded for {restaurant_id}: requested {requested}, load {load}/{max_capacity}")]
    CapacityExceeded {
        restaurant_id: RestaurantId,
        requested: u32,
        load: u32,
        max_capacity: u32,
    },

    /// Reservations must claim at least one item.
    #[error("Cannot reserve zero items at {0}")]
    EmptyReservation(RestaurantId),

    /// The restaurant's cell stopped before answering.
    #[error("Capacity cell for {0} is unavailable")]
    Unavailable(RestaurantId),
}
