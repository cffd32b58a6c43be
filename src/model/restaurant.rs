use super::record_id;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

record_id!(
    /// Identifier of a restaurant.
    RestaurantId,
    "restaurant"
);

/// A restaurant as kept by the restaurant store.
///
/// The live processing load is not stored here: it is owned by the restaurant's cell in
/// the [`CapacityLedger`](crate::ledger::CapacityLedger) and read with `current_load`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub address: String,
    pub cuisine_type: Option<String>,
    pub rating: Decimal,
    pub is_open: bool,
    /// Number of items the kitchen can have in preparation at once.
    pub max_capacity: u32,
}

/// Payload for registering a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub address: String,
    pub cuisine_type: Option<String>,
    pub rating: Decimal,
    pub max_capacity: u32,
    #[serde(default = "default_open")]
    pub is_open: bool,
}

fn default_open() -> bool {
    true
}

/// Changes applied to a stored restaurant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RestaurantUpdate {
    OpenStatus(bool),
    Rating(Decimal),
    Details { name: String, address: String },
}

impl RestaurantCreate {
    pub fn new(name: impl Into<String>, rating: Decimal, max_capacity: u32) -> Self {
        Self {
            name: name.into(),
            address: String::new(),
            cuisine_type: None,
            rating,
            max_capacity,
            is_open: true,
        }
    }
}
