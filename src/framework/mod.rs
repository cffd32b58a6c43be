//! In-memory actor-backed stores.
//!
//! The order core treats restaurants, menu items, customers and orders as external
//! records reachable through load/save calls. This module provides those calls as
//! actors: one [`StoreActor`] task per record type, reached through a cloneable
//! [`StoreClient`].
//!
//! - [`StoreEntity`] - contract for stored records
//! - [`StoreActor`] - task owning the records
//! - [`StoreClient`] - async request/response handle
//! - [`FrameworkError`] - store communication and validation errors
//!
//! See [`mock`] for a scripted store used to inject failures in tests.

pub mod actor;
pub mod client;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

pub use actor::StoreActor;
pub use client::StoreClient;
pub use entity::StoreEntity;
pub use error::FrameworkError;
pub use message::{Filter, Response, StoreRequest};
