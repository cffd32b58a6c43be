use crate::config::DispatchConfig;
use crate::dispatch::{BucketProcessor, DispatchScheduler, PreparationProcessor};
use crate::grouper::OrderGrouper;
use crate::ledger::{CapacityLedger, CapacitySnapshot};
use crate::model::{
    CustomerId, MenuItem, MenuItemCreate, OrderItemRequest, PinnedItemRequest, Restaurant,
    RestaurantCreate, RestaurantId,
};
use crate::placement::{OrderPlacement, PendingOrder, PlacementError};
use crate::selector::SelectionStrategy;
use crate::stores::{
    customer_store, menu_store, order_store, restaurant_store, CustomerStore, MenuStore,
    OrderStore, RestaurantStore,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

/// The running food ordering system.
///
/// Owns the store actors, the capacity ledger and the dispatch scheduler, and exposes
/// the typed store clients and the placement service.
///
/// ```rust,no_run
/// use food_dispatch::config::DispatchConfig;
/// use food_dispatch::lifecycle::FoodOrderSystem;
/// use food_dispatch::model::{CustomerId, MenuItemCreate, OrderItemRequest, RestaurantCreate};
/// use food_dispatch::selector::SelectionStrategy;
/// use rust_decimal::Decimal;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let system = FoodOrderSystem::new(DispatchConfig::default());
///     let r = system
///         .register_restaurant(RestaurantCreate::new("Pizzeria", Decimal::from(4), 5))
///         .await?;
///     system
///         .add_menu_item(MenuItemCreate::new(r.id, "Pizza", Decimal::from(12)))
///         .await?;
///
///     let order = system
///         .place_order(
///             vec![OrderItemRequest::new("Pizza", Decimal::from(12), 3)],
///             CustomerId(1),
///             SelectionStrategy::HighestRating,
///         )
///         .await?;
///     println!("placed {}", order.id);
///
///     system.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct FoodOrderSystem {
    pub restaurants: RestaurantStore,
    pub menus: MenuStore,
    pub orders: OrderStore,
    pub customers: CustomerStore,
    pub placement: OrderPlacement,
    ledger: Arc<CapacityLedger>,
    scheduler: Arc<DispatchScheduler>,
    handles: Vec<JoinHandle<()>>,
}

impl FoodOrderSystem {
    /// Starts the system with the default [`PreparationProcessor`].
    pub fn new(config: DispatchConfig) -> Self {
        let processor = Arc::new(PreparationProcessor::new(config.processing_time()));
        Self::with_processor(config, processor)
    }

    /// Starts the system with a custom kitchen processor.
    pub fn with_processor(config: DispatchConfig, processor: Arc<dyn BucketProcessor>) -> Self {
        let buffer = config.buffer();

        let (restaurant_actor, restaurants) = restaurant_store::new(buffer);
        let (menu_actor, menus) = menu_store::new(buffer);
        let (order_actor, orders) = order_store::new(buffer);
        let (customer_actor, customers) = customer_store::new(buffer);

        let handles = vec![
            tokio::spawn(restaurant_actor.run()),
            tokio::spawn(menu_actor.run()),
            tokio::spawn(order_actor.run()),
            tokio::spawn(customer_actor.run()),
        ];

        let ledger = Arc::new(CapacityLedger::new(buffer));
        let scheduler = Arc::new(DispatchScheduler::new(
            ledger.clone(),
            processor,
            config.preparation_time(),
            buffer,
        ));
        let grouper = OrderGrouper::new(menus.clone(), restaurants.clone());
        let placement = OrderPlacement::new(grouper, orders.clone(), ledger.clone(), scheduler.clone());

        info!(?config, "Food order system started");
        Self {
            restaurants,
            menus,
            orders,
            customers,
            placement,
            ledger,
            scheduler,
            handles,
        }
    }

    /// Saves a restaurant and activates its capacity cell and worker pool.
    #[instrument(skip(self, params), fields(name = %params.name))]
    pub async fn register_restaurant(
        &self,
        params: RestaurantCreate,
    ) -> Result<Restaurant, PlacementError> {
        let restaurant = self.restaurants.save(params).await?;
        self.ledger.register(&restaurant);
        self.scheduler.activate(restaurant.id, restaurant.max_capacity);
        info!(restaurant_id = %restaurant.id, "Restaurant registered");
        Ok(restaurant)
    }

    /// Adds a dish to an existing restaurant's menu.
    #[instrument(skip(self, params), fields(restaurant_id = %params.restaurant_id, name = %params.name))]
    pub async fn add_menu_item(&self, params: MenuItemCreate) -> Result<MenuItem, PlacementError> {
        self.restaurants.load(params.restaurant_id).await?;
        Ok(self.menus.save(params).await?)
    }

    /// Opens or closes a restaurant, in the store and in the ledger.
    #[instrument(skip(self))]
    pub async fn set_open_status(
        &self,
        restaurant_id: RestaurantId,
        open: bool,
    ) -> Result<Restaurant, PlacementError> {
        let restaurant = self.restaurants.update_open_status(restaurant_id, open).await?;
        self.ledger.set_open(restaurant_id, open).await?;
        Ok(restaurant)
    }

    /// Deletes a restaurant with its menu and stops its cell and worker pool.
    #[instrument(skip(self))]
    pub async fn remove_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Restaurant, PlacementError> {
        let restaurant = self.restaurants.delete(restaurant_id).await?;
        let removed_items = self.menus.delete_by_restaurant(restaurant_id).await?;
        self.ledger.retire(restaurant_id);
        self.scheduler.retire(restaurant_id);
        info!(removed_items, "Restaurant removed");
        Ok(restaurant)
    }

    pub fn place_order(
        &self,
        items: Vec<OrderItemRequest>,
        customer_id: CustomerId,
        strategy: SelectionStrategy,
    ) -> PendingOrder {
        self.placement.place_order(items, customer_id, strategy)
    }

    pub fn place_pinned_order(
        &self,
        items: Vec<PinnedItemRequest>,
        customer_id: CustomerId,
    ) -> PendingOrder {
        self.placement.place_pinned_order(items, customer_id)
    }

    pub async fn capacity(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<CapacitySnapshot, PlacementError> {
        Ok(self.ledger.snapshot(restaurant_id).await?)
    }

    /// Stops everything: worker pools and deadline timers, then capacity cells, then
    /// the store actors.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down food order system");

        self.scheduler.shutdown().await;
        self.ledger.shutdown().await;

        drop(self.placement);
        drop(self.restaurants);
        drop(self.menus);
        drop(self.orders);
        drop(self.customers);

        let mut failures = 0;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Store actor failed during shutdown");
                failures += 1;
            }
        }
        if failures > 0 {
            return Err(format!("{failures} store actor(s) failed during shutdown"));
        }

        info!("Food order system shut down");
        Ok(())
    }
}
