//! Typed clients for the record stores.
//!
//! Each submodule implements [`StoreEntity`](crate::framework::StoreEntity) for one
//! record type, wraps the generic [`StoreClient`](crate::framework::StoreClient) in a
//! domain client, and exposes a `new(buffer_size)` factory returning the actor and
//! the client.

pub mod customer_store;
pub mod error;
pub mod menu_store;
pub mod order_store;
pub mod restaurant_store;

pub use customer_store::CustomerStore;
pub use error::StoreError;
pub use menu_store::MenuStore;
pub use order_store::OrderStore;
pub use restaurant_store::RestaurantStore;
