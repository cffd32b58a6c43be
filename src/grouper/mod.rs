//! # Order Grouping
//!
//! Splits an incoming order into per-restaurant buckets. For every requested item the
//! grouper finds the menu listings whose name matches, builds one [`Candidate`] per
//! distinct restaurant, lets the [`SelectionStrategy`] choose, and records the chosen
//! restaurant's menu item on the request.
//!
//! Items the customer already pinned to a restaurant skip selection; the grouper only
//! checks that the restaurant really lists the menu item.
//!
//! Grouping is all-or-nothing: the first item that cannot be resolved fails the call
//! and no buckets are returned.

pub mod error;

pub use error::GroupingError;

use crate::model::{MenuItem, OrderItemRequest, PinnedItemRequest, RestaurantId};
use crate::selector::{Candidate, SelectionStrategy};
use crate::stores::{MenuStore, RestaurantStore};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Items bucketed by the restaurant that will prepare them. Keys iterate in id order.
pub type Buckets = BTreeMap<RestaurantId, Vec<OrderItemRequest>>;

#[derive(Clone)]
pub struct OrderGrouper {
    menus: MenuStore,
    restaurants: RestaurantStore,
}

impl OrderGrouper {
    pub fn new(menus: MenuStore, restaurants: RestaurantStore) -> Self {
        Self { menus, restaurants }
    }

    #[instrument(skip(self, items, strategy), fields(items = items.len(), %strategy))]
    pub async fn group_by_restaurant(
        &self,
        items: Vec<OrderItemRequest>,
        strategy: SelectionStrategy,
    ) -> Result<Buckets, GroupingError> {
        let mut buckets = Buckets::new();
        for mut item in items {
            let candidates = self.candidates_for(&item.name).await?;
            if candidates.is_empty() {
                return Err(GroupingError::NoOfferings(item.name));
            }
            let chosen = strategy.select_one(&candidates, &item)?;
            let restaurant_id = chosen.restaurant.id;
            item.menu_item_id = Some(chosen.offering.id);
            debug!(item = %item.name, %restaurant_id, menu_item_id = %chosen.offering.id, "Item bucketed");
            buckets.entry(restaurant_id).or_default().push(item);
        }
        Ok(buckets)
    }

    /// Buckets items by the restaurant the customer pinned them to, priced from the
    /// menu listing.
    #[instrument(skip(self, items), fields(items = items.len()))]
    pub async fn group_pinned(&self, items: Vec<PinnedItemRequest>) -> Result<Buckets, GroupingError> {
        let mut buckets = Buckets::new();
        for item in items {
            let listing = self
                .menus
                .get(item.menu_item_id)
                .await?
                .ok_or(GroupingError::UnknownMenuItem(item.menu_item_id))?;
            if listing.restaurant_id != item.restaurant_id {
                return Err(GroupingError::NotOnMenu {
                    menu_item_id: item.menu_item_id,
                    restaurant_id: item.restaurant_id,
                });
            }
            let mut request = OrderItemRequest::new(listing.name, listing.price, item.quantity);
            request.menu_item_id = Some(listing.id);
            buckets.entry(item.restaurant_id).or_default().push(request);
        }
        Ok(buckets)
    }

    /// One candidate per distinct restaurant listing `name`, in first-seen order.
    ///
    /// A listing whose restaurant no longer exists is skipped.
    async fn candidates_for(&self, name: &str) -> Result<Vec<Candidate>, GroupingError> {
        let listings = self.menus.find_by_name_contains(name).await?;

        let mut offerings: Vec<MenuItem> = Vec::new();
        for listing in listings {
            if !offerings.iter().any(|o| o.restaurant_id == listing.restaurant_id) {
                offerings.push(listing);
            }
        }

        let ids: Vec<RestaurantId> = offerings.iter().map(|o| o.restaurant_id).collect();
        let restaurants = self.restaurants.find_all_by_id(&ids).await?;

        Ok(offerings
            .into_iter()
            .filter_map(|offering| {
                restaurants
                    .iter()
                    .find(|r| r.id == offering.restaurant_id)
                    .map(|restaurant| Candidate {
                        restaurant: restaurant.clone(),
                        offering,
                    })
            })
            .collect())
    }
}
