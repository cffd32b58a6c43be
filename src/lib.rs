//! # Food Dispatch
//!
//! Routes food orders to restaurants with finite kitchen capacity.
//!
//! Every restaurant can prepare at most `max_capacity` items at once. Placing an order
//! resolves which restaurant prepares each item, reserves capacity at every involved
//! restaurant atomically, hands the work to that restaurant's worker pool and releases
//! the capacity exactly once when the work finishes or its preparation deadline passes.
//!
//! ## Module Tour
//!
//! ### The Engine ([`framework`])
//! A generic [`StoreActor`](framework::StoreActor) owning an in-memory table of any
//! [`StoreEntity`](framework::StoreEntity), with a typed
//! [`StoreClient`](framework::StoreClient) and a [`mock`](framework::mock) for tests.
//!
//! ### Records and Stores ([`model`], [`stores`])
//! Restaurants, menu items, customers and orders, each with a domain client
//! ([`RestaurantStore`](stores::RestaurantStore), [`MenuStore`](stores::MenuStore), ...).
//!
//! ### The Order Core
//! - [`ledger`]: per-restaurant capacity cells and one-shot [`Reservation`](ledger::Reservation)s.
//! - [`selector`]: the [`SelectionStrategy`](selector::SelectionStrategy) used when several
//!   restaurants offer an item.
//! - [`grouper`]: splits an order into per-restaurant buckets.
//! - [`dispatch`]: worker pools and preparation deadlines.
//! - [`placement`]: the end-to-end [`OrderPlacement`](placement::OrderPlacement) service.
//!
//! ### Wiring ([`lifecycle`], [`config`])
//! [`FoodOrderSystem`](lifecycle::FoodOrderSystem) starts and stops everything from a
//! [`DispatchConfig`](config::DispatchConfig).
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! FOOD_DISPATCH_PREPARATION_TIME_MS=1000 RUST_LOG=debug cargo run
//! ```

pub mod config;
pub mod dispatch;
pub mod framework;
pub mod grouper;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod placement;
pub mod selector;
pub mod stores;
