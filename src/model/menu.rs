use super::record_id;
use super::RestaurantId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

record_id!(
    /// Identifier of a menu item.
    MenuItemId,
    "menu_item"
);

/// A dish offered by exactly one restaurant. Read-only for the order core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

impl MenuItemCreate {
    pub fn new(restaurant_id: RestaurantId, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            restaurant_id,
            name: name.into(),
            description: None,
            price,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub price: Option<Decimal>,
    pub description: Option<String>,
}
