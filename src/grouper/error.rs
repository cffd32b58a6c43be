use crate::model::{MenuItemId, RestaurantId};
use crate::selector::SelectionError;
use crate::stores::StoreError;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GroupingError {
    /// No menu listing matches the requested item name.
    #[error("No restaurant offers {0}")]
    NoOfferings(String),

    #[error("{0} not found")]
    UnknownMenuItem(MenuItemId),

    /// A pinned item names a restaurant that does not list it.
    #[error("{menu_item_id} is not on the menu of {restaurant_id}")]
    NotOnMenu {
        menu_item_id: MenuItemId,
        restaurant_id: RestaurantId,
    },

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Store error while grouping: {0}")]
    Store(#[from] StoreError),
}
