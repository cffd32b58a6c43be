//! # System Lifecycle
//!
//! [`FoodOrderSystem`] starts every actor, wires the order core together and tears it
//! down again.
//!
//! ## Startup
//!
//! 1. One [`StoreActor`](crate::framework::StoreActor) task per record type.
//! 2. The [`CapacityLedger`](crate::ledger::CapacityLedger) (cells appear as restaurants
//!    are registered).
//! 3. The [`DispatchScheduler`](crate::dispatch::DispatchScheduler) with the configured
//!    [`BucketProcessor`](crate::dispatch::BucketProcessor).
//! 4. The [`OrderGrouper`](crate::grouper::OrderGrouper) and
//!    [`OrderPlacement`](crate::placement::OrderPlacement) on top.
//!
//! ## Shutdown
//!
//! Order matters: the scheduler goes first so that no worker or timer still holds a
//! reservation, then the ledger cells, then the stores. Store actors stop once the
//! last client clone is dropped, so callers should drop any clones they took before
//! calling [`FoodOrderSystem::shutdown`].

pub mod food_system;
pub mod tracing;

pub use self::food_system::FoodOrderSystem;
pub use self::tracing::setup_tracing;
