//! # Logging
//!
//! [`setup_tracing`] installs a compact `tracing` subscriber filtered by `RUST_LOG`.
//! Module paths are hidden; events carry structured fields instead (`restaurant_id`,
//! `reservation`, `load`, `entity_type`).
//!
//! ```bash
//! RUST_LOG=info cargo run     # reservations, releases, placed orders
//! RUST_LOG=debug cargo run    # plus store requests and selection decisions
//! ```
//!
//! A placement at `info` reads roughly:
//!
//! ```text
//! INFO place_order: Reserved restaurant_id=restaurant_1 reservation=restaurant_1/rsv_1x3 load=3
//! INFO place_order:submit: Bucket dispatched
//! INFO place_order:save: Order persisted order_id=order_1 total=36
//! INFO place_order: Order placed order_id=order_1 total=36
//! INFO Preparing restaurant_id=restaurant_1 item=Pizza quantity=3
//! INFO Bucket prepared restaurant_id=restaurant_1 reservation=restaurant_1/rsv_1x3
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
