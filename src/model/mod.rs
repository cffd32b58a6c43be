//! Domain records shared by the stores and the order core.
//!
//! Identifiers are newtypes over the `u32` sequence each store hands out, so a
//! `RestaurantId` can never be passed where a `MenuItemId` is expected.

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

pub(crate) use record_id;

pub mod customer;
pub mod error;
pub mod menu;
pub mod order;
pub mod restaurant;

pub use customer::*;
pub use error::*;
pub use menu::*;
pub use order::*;
pub use restaurant::*;
