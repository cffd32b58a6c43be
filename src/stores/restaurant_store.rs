//! # Restaurant Store
//!
//! Restaurant records and the typed client over them.

use crate::framework::{StoreActor, StoreClient, StoreEntity};
use crate::model::{
    MenuItemId, Restaurant, RestaurantCreate, RestaurantId, RestaurantUpdate, ValidationError,
};
use crate::stores::{MenuStore, StoreError};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

fn check_rating(rating: Decimal) -> Result<(), ValidationError> {
    if rating < Decimal::ZERO || rating > Decimal::from(5) {
        return Err(ValidationError::RatingOutOfRange(rating));
    }
    Ok(())
}

impl StoreEntity for Restaurant {
    type Id = RestaurantId;
    type Create = RestaurantCreate;
    type Update = RestaurantUpdate;
    type Error = ValidationError;

    fn from_create(id: RestaurantId, params: RestaurantCreate) -> Result<Self, ValidationError> {
        if params.name.trim().is_empty() {
            return Err(ValidationError::Empty("restaurant name"));
        }
        if params.max_capacity == 0 {
            return Err(ValidationError::ZeroCapacity);
        }
        check_rating(params.rating)?;
        Ok(Self {
            id,
            name: params.name,
            address: params.address,
            cuisine_type: params.cuisine_type,
            rating: params.rating,
            is_open: params.is_open,
            max_capacity: params.max_capacity,
        })
    }

    fn apply_update(&mut self, update: RestaurantUpdate) -> Result<(), ValidationError> {
        match update {
            RestaurantUpdate::OpenStatus(open) => self.is_open = open,
            RestaurantUpdate::Rating(rating) => {
                check_rating(rating)?;
                self.rating = rating;
            }
            RestaurantUpdate::Details { name, address } => {
                if name.trim().is_empty() {
                    return Err(ValidationError::Empty("restaurant name"));
                }
                self.name = name;
                self.address = address;
            }
        }
        Ok(())
    }
}

/// Client for the restaurant store.
#[derive(Clone)]
pub struct RestaurantStore {
    inner: StoreClient<Restaurant>,
}

impl RestaurantStore {
    pub fn new(inner: StoreClient<Restaurant>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn save(&self, params: RestaurantCreate) -> Result<Restaurant, StoreError> {
        debug!("Sending request");
        Ok(self.inner.save(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: RestaurantId) -> Result<Option<Restaurant>, StoreError> {
        Ok(self.inner.get(id).await?)
    }

    /// Like [`get`](Self::get), but a missing restaurant is an error.
    pub async fn load(&self, id: RestaurantId) -> Result<Restaurant, StoreError> {
        self.get(id)
            .await?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Restaurants whose name contains `keyword`, ignoring case.
    #[instrument(skip(self))]
    pub async fn find_by_name_contains(&self, keyword: &str) -> Result<Vec<Restaurant>, StoreError> {
        let needle = keyword.to_lowercase();
        Ok(self
            .inner
            .query("name_contains", move |r: &Restaurant| {
                r.name.to_lowercase().contains(&needle)
            })
            .await?)
    }

    /// Restaurants with the given ids, in the order of `ids`. Unknown ids are skipped.
    #[instrument(skip(self))]
    pub async fn find_all_by_id(&self, ids: &[RestaurantId]) -> Result<Vec<Restaurant>, StoreError> {
        let wanted = ids.to_vec();
        let mut found = self
            .inner
            .query("all_by_id", move |r: &Restaurant| wanted.contains(&r.id))
            .await?;
        found.sort_by_key(|r| ids.iter().position(|id| *id == r.id));
        Ok(found)
    }

    /// The restaurant offering the given menu item, if both exist.
    #[instrument(skip(self, menus))]
    pub async fn find_serving(
        &self,
        menus: &MenuStore,
        menu_item_id: MenuItemId,
    ) -> Result<Option<Restaurant>, StoreError> {
        match menus.get(menu_item_id).await? {
            Some(item) => self.get(item.restaurant_id).await,
            None => Ok(None),
        }
    }

    /// Changes only the stored record. The capacity ledger keeps its own open flag, so
    /// a running system must go through
    /// [`FoodOrderSystem::set_open_status`](crate::lifecycle::FoodOrderSystem::set_open_status),
    /// which updates both.
    #[instrument(skip(self))]
    pub async fn update_open_status(
        &self,
        id: RestaurantId,
        open: bool,
    ) -> Result<Restaurant, StoreError> {
        Ok(self
            .inner
            .update(id, RestaurantUpdate::OpenStatus(open))
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn update(
        &self,
        id: RestaurantId,
        update: RestaurantUpdate,
    ) -> Result<Restaurant, StoreError> {
        Ok(self.inner.update(id, update).await?)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: RestaurantId) -> Result<Restaurant, StoreError> {
        Ok(self.inner.delete(id).await?)
    }
}

/// Creates the restaurant store actor and its client.
pub fn new(buffer_size: usize) -> (StoreActor<Restaurant>, RestaurantStore) {
    let (actor, client) = StoreActor::new(buffer_size);
    (actor, RestaurantStore::new(client))
}
