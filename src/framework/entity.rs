//! # StoreEntity Trait
//!
//! The contract every record kept by a [`StoreActor`](crate::framework::StoreActor) must
//! satisfy: restaurants, menu items and orders. The trait fixes the identifier type, the
//! payloads used to create and update a record, and the error raised when a payload is
//! rejected.
//!
//! Records are validated synchronously inside the actor task, so a store never holds a
//! record that failed [`StoreEntity::from_create`] or [`StoreEntity::apply_update`].

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A record managed by a [`StoreActor`](crate::framework::StoreActor).
///
/// `Id` must be `Ord` so queries return records in id order. Callers that depend on
/// "first occurrence" semantics (restaurant selection) rely on that ordering.
pub trait StoreEntity: Clone + Send + Sync + Debug + 'static {
    /// Identifier assigned by the store. Built from the store's `u32` sequence.
    type Id: Eq + Ord + Hash + Clone + Copy + Send + Sync + Display + Debug + From<u32>;

    /// Payload required to create a record.
    type Create: Send + Sync + Debug;

    /// Payload applied to an existing record.
    type Update: Send + Sync + Debug;

    /// Validation error for create/update payloads.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Build the record from its freshly assigned id and the create payload.
    fn from_create(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Apply an update in place. Must leave the record untouched on error.
    fn apply_update(&mut self, update: Self::Update) -> Result<(), Self::Error>;
}
