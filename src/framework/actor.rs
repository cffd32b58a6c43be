//! # Store Actor
//!
//! The server half of a store: a Tokio task that owns every record of one type and
//! answers [`StoreRequest`]s sequentially. Exclusive ownership of the map inside the
//! task is what makes saves and updates atomic without a lock.

use crate::framework::client::StoreClient;
use crate::framework::entity::StoreEntity;
use crate::framework::error::FrameworkError;
use crate::framework::message::StoreRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Actor owning the records of one entity type.
///
/// Records live in a `BTreeMap` so [`StoreRequest::Query`] yields them in id order.
pub struct StoreActor<T: StoreEntity> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    records: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: StoreEntity> StoreActor<T> {
    /// Creates the actor and the client used to reach it.
    ///
    /// `buffer_size` bounds the request channel; callers wait for space when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: BTreeMap::new(),
            next_id: 1,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs the request loop until every client has been dropped.
    pub async fn run(mut self) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Save { params, respond_to } => {
                    debug!(entity_type, ?params, "Save");
                    let id = T::Id::from(self.next_id);
                    match T::from_create(id, params) {
                        Ok(record) => {
                            self.next_id += 1;
                            self.records.insert(id, record.clone());
                            info!(entity_type, %id, size = self.records.len(), "Saved");
                            let _ = respond_to.send(Ok(record));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Save rejected");
                            let _ = respond_to.send(Err(FrameworkError::Rejected(Box::new(e))));
                        }
                    }
                }
                StoreRequest::Get { id, respond_to } => {
                    let record = self.records.get(&id).cloned();
                    debug!(entity_type, %id, found = record.is_some(), "Get");
                    let _ = respond_to.send(Ok(record));
                }
                StoreRequest::Query {
                    label,
                    filter,
                    respond_to,
                } => {
                    let matches: Vec<T> = self
                        .records
                        .values()
                        .filter(|record| filter(record))
                        .cloned()
                        .collect();
                    debug!(entity_type, label, hits = matches.len(), "Query");
                    let _ = respond_to.send(Ok(matches));
                }
                StoreRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(record) = self.records.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    // Work on a copy so a rejected update leaves the stored record intact.
                    let mut candidate = record.clone();
                    match candidate.apply_update(update) {
                        Ok(()) => {
                            *record = candidate.clone();
                            info!(entity_type, %id, "Updated");
                            let _ = respond_to.send(Ok(candidate));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Update rejected");
                            let _ = respond_to.send(Err(FrameworkError::Rejected(Box::new(e))));
                        }
                    }
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    match self.records.remove(&id) {
                        Some(record) => {
                            info!(entity_type, %id, size = self.records.len(), "Deleted");
                            let _ = respond_to.send(Ok(record));
                        }
                        None => {
                            warn!(entity_type, %id, "Not found");
                            let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        }
                    }
                }
            }
        }

        info!(entity_type, size = self.records.len(), "Store shutdown");
    }
}
