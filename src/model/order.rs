use super::record_id;
use super::{CustomerId, MenuItemId, RestaurantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

record_id!(
    /// Identifier of a persisted order.
    OrderId,
    "order"
);

/// Lifecycle status of an order. Placement only ever produces `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
}

/// One line of an incoming order, as sent by the customer.
///
/// `menu_item_id` starts empty and is filled in by the
/// [`OrderGrouper`](crate::grouper::OrderGrouper) once a restaurant has been chosen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub menu_item_id: Option<MenuItemId>,
}

impl OrderItemRequest {
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity,
            menu_item_id: None,
        }
    }

    /// Price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// One line of an order whose customer already chose the restaurant, e.g. from a cart
/// built while browsing a single menu.
///
/// The price is taken from the menu listing when the order is placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedItemRequest {
    pub restaurant_id: RestaurantId,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

impl PinnedItemRequest {
    pub fn new(restaurant_id: RestaurantId, menu_item_id: MenuItemId, quantity: u32) -> Self {
        Self {
            restaurant_id,
            menu_item_id,
            quantity,
        }
    }
}

/// A persisted order line, attributed to the restaurant that prepares it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub menu_item_id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub quantity: u32,
    pub price: Decimal,
}

/// A placed order. Immutable once saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Restaurants this order was split across, in item order without duplicates.
    pub fn restaurants(&self) -> Vec<RestaurantId> {
        let mut seen = Vec::new();
        for item in &self.items {
            if !seen.contains(&item.restaurant_id) {
                seen.push(item.restaurant_id);
            }
        }
        seen
    }
}

/// Payload for persisting an order. The store computes the total and sets the status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: CustomerId,
    pub items: Vec<OrderItem>,
}
