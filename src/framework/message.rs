//! # Store Messages
//!
//! Requests sent from a [`StoreClient`](crate::framework::StoreClient) to its
//! [`StoreActor`](crate::framework::StoreActor). Every request carries a one-shot
//! responder; the actor answers each request exactly once.

use crate::framework::entity::StoreEntity;
use crate::framework::error::FrameworkError;
use tokio::sync::oneshot;

/// One-shot response channel used by store actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Predicate evaluated inside the actor task against every stored record.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Request processed by a store actor.
///
/// The variants map to the load/save operations the order core needs: `Save` assigns
/// an id, `Get` and `Query` read, `Update` mutates in place, `Delete` removes.
pub enum StoreRequest<T: StoreEntity> {
    Save {
        params: T::Create,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Query {
        label: &'static str,
        filter: Filter<T>,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T>,
    },
}

impl<T: StoreEntity> std::fmt::Debug for StoreRequest<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreRequest::Save { params, .. } => f.debug_struct("Save").field("params", params).finish(),
            StoreRequest::Get { id, .. } => f.debug_struct("Get").field("id", id).finish(),
            StoreRequest::Query { label, .. } => f.debug_struct("Query").field("label", label).finish(),
            StoreRequest::Update { id, update, .. } => f
                .debug_struct("Update")
                .field("id", id)
                .field("update", update)
                .finish(),
            StoreRequest::Delete { id, .. } => f.debug_struct("Delete").field("id", id).finish(),
        }
    }
}
