use crate::dispatch::DispatchError;
use crate::grouper::GroupingError;
use crate::ledger::LedgerError;
use crate::model::RestaurantId;
use crate::selector::SelectionError;
use crate::stores::StoreError;
use thiserror::Error;

/// Why an order could not be placed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlacementError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Restaurant {restaurant_id} cannot take {requested} more items (load {load}/{max_capacity})")]
    CapacityExceeded {
        restaurant_id: RestaurantId,
        requested: u32,
        load: u32,
        max_capacity: u32,
    },

    #[error("Restaurant {0} is closed")]
    Closed(RestaurantId),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No restaurant offers {0}")]
    NoOfferings(String),

    #[error("Restaurant selection failed: {0}")]
    SelectionFailure(String),

    /// A store could not be reached or refused a write.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// The placement task failed outside the normal error paths.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LedgerError> for PlacementError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotFound(id) => PlacementError::NotFound(id.to_string()),
            LedgerError::Closed(id) => PlacementError::Closed(id),
            LedgerError::CapacityExceeded {
                restaurant_id,
                requested,
                load,
                max_capacity,
            } => PlacementError::CapacityExceeded {
                restaurant_id,
                requested,
                load,
                max_capacity,
            },
            e @ LedgerError::EmptyReservation(_) => PlacementError::InvalidRequest(e.to_string()),
            e @ LedgerError::Unavailable(_) => PlacementError::Internal(e.to_string()),
        }
    }
}

impl From<SelectionError> for PlacementError {
    fn from(e: SelectionError) -> Self {
        match e {
            SelectionError::NoCandidates(_) => PlacementError::SelectionFailure(e.to_string()),
            SelectionError::UnknownStrategy(_) => PlacementError::InvalidRequest(e.to_string()),
        }
    }
}

impl From<GroupingError> for PlacementError {
    fn from(e: GroupingError) -> Self {
        match e {
            GroupingError::NoOfferings(name) => PlacementError::NoOfferings(name),
            GroupingError::UnknownMenuItem(id) => PlacementError::NotFound(id.to_string()),
            e @ GroupingError::NotOnMenu { .. } => PlacementError::InvalidRequest(e.to_string()),
            GroupingError::Selection(e) => e.into(),
            GroupingError::Store(e) => e.into(),
        }
    }
}

impl From<StoreError> for PlacementError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => PlacementError::NotFound(what),
            other => PlacementError::Store(other),
        }
    }
}

impl From<DispatchError> for PlacementError {
    fn from(e: DispatchError) -> Self {
        PlacementError::Internal(e.to_string())
    }
}
