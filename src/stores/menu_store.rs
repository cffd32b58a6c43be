//! # Menu Store
//!
//! Menu items, looked up by id, by owning restaurant, or by name fragment.

use crate::framework::{StoreActor, StoreClient, StoreEntity};
use crate::model::{MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate, RestaurantId, ValidationError};
use crate::stores::StoreError;
use rust_decimal::Decimal;
use tracing::instrument;

impl StoreEntity for MenuItem {
    type Id = MenuItemId;
    type Create = MenuItemCreate;
    type Update = MenuItemUpdate;
    type Error = ValidationError;

    fn from_create(id: MenuItemId, params: MenuItemCreate) -> Result<Self, ValidationError> {
        if params.name.trim().is_empty() {
            return Err(ValidationError::Empty("menu item name"));
        }
        if params.price <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrice(params.price));
        }
        Ok(Self {
            id,
            restaurant_id: params.restaurant_id,
            name: params.name,
            description: params.description,
            price: params.price,
        })
    }

    fn apply_update(&mut self, update: MenuItemUpdate) -> Result<(), ValidationError> {
        if let Some(price) = update.price {
            if price <= Decimal::ZERO {
                return Err(ValidationError::NonPositivePrice(price));
            }
            self.price = price;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        Ok(())
    }
}

/// Client for the menu store.
#[derive(Clone)]
pub struct MenuStore {
    inner: StoreClient<MenuItem>,
}

impl MenuStore {
    pub fn new(inner: StoreClient<MenuItem>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn save(&self, params: MenuItemCreate) -> Result<MenuItem, StoreError> {
        Ok(self.inner.save(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: MenuItemId) -> Result<Option<MenuItem>, StoreError> {
        Ok(self.inner.get(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_by_restaurant(&self, restaurant_id: RestaurantId) -> Result<Vec<MenuItem>, StoreError> {
        Ok(self
            .inner
            .query("by_restaurant", move |m: &MenuItem| m.restaurant_id == restaurant_id)
            .await?)
    }

    /// Menu items whose name contains `keyword`, ignoring case, in id order.
    #[instrument(skip(self))]
    pub async fn find_by_name_contains(&self, keyword: &str) -> Result<Vec<MenuItem>, StoreError> {
        let needle = keyword.to_lowercase();
        Ok(self
            .inner
            .query("name_contains", move |m: &MenuItem| {
                m.name.to_lowercase().contains(&needle)
            })
            .await?)
    }

    /// Removes every menu item of a restaurant; returns how many were removed.
    #[instrument(skip(self))]
    pub async fn delete_by_restaurant(&self, restaurant_id: RestaurantId) -> Result<usize, StoreError> {
        let items = self.find_by_restaurant(restaurant_id).await?;
        for item in &items {
            self.inner.delete(item.id).await?;
        }
        Ok(items.len())
    }
}

/// Creates the menu store actor and its client.
pub fn new(buffer_size: usize) -> (StoreActor<MenuItem>, MenuStore) {
    let (actor, client) = StoreActor::new(buffer_size);
    (actor, MenuStore::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_by_name_contains_ignores_case() {
        let (actor, menus) = new(8);
        tokio::spawn(actor.run());

        menus
            .save(MenuItemCreate::new(RestaurantId(1), "Margherita Pizza", Decimal::from(10)))
            .await
            .unwrap();
        menus
            .save(MenuItemCreate::new(RestaurantId(2), "PIZZA bianca", Decimal::from(12)))
            .await
            .unwrap();
        menus
            .save(MenuItemCreate::new(RestaurantId(2), "Ramen", Decimal::from(9)))
            .await
            .unwrap();

        let hits = menus.find_by_name_contains("pizza").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].restaurant_id, RestaurantId(1));

        assert_eq!(menus.find_by_restaurant(RestaurantId(2)).await.unwrap().len(), 2);
        assert_eq!(menus.delete_by_restaurant(RestaurantId(2)).await.unwrap(), 2);
        assert!(menus.find_by_name_contains("ramen").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_free_items() {
        let (actor, menus) = new(8);
        tokio::spawn(actor.run());

        let err = menus
            .save(MenuItemCreate::new(RestaurantId(1), "Water", Decimal::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
    }
}
