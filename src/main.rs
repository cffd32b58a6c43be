//! Demo: one restaurant, one order, then watch the capacity come back.

use food_dispatch::config::DispatchConfig;
use food_dispatch::lifecycle::{setup_tracing, FoodOrderSystem};
use food_dispatch::model::{CustomerCreate, MenuItemCreate, OrderItemRequest, RestaurantCreate};
use food_dispatch::selector::SelectionStrategy;
use rust_decimal::Decimal;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = DispatchConfig::from_env().map_err(|e| e.to_string())?;
    let preparation_time = config.preparation_time();
    let system = FoodOrderSystem::new(config);

    let setup = async {
        let restaurant = system
            .register_restaurant(RestaurantCreate::new("Luigi's Pizzeria", Decimal::new(45, 1), 5))
            .await?;
        system
            .add_menu_item(MenuItemCreate::new(restaurant.id, "Pizza", Decimal::from(12)))
            .await?;
        let customer = system
            .customers
            .save(CustomerCreate::new("Alice", "alice@example.com"))
            .await?;
        Ok::<_, food_dispatch::placement::PlacementError>((restaurant, customer))
    }
    .instrument(tracing::info_span!("setup"))
    .await;
    let (restaurant, customer) = setup.map_err(|e| e.to_string())?;

    let order = system
        .place_order(
            vec![OrderItemRequest::new("Pizza", Decimal::from(12), 3)],
            customer.id,
            SelectionStrategy::HighestRating,
        )
        .await;

    match order {
        Ok(order) => {
            info!(order_id = %order.id, total = %order.total_amount, "Order placed");
            let load = system.placement.current_load(restaurant.id).await.map_err(|e| e.to_string())?;
            info!(restaurant_id = %restaurant.id, load, "Load after placement");
        }
        Err(e) => error!(error = %e, "Order failed"),
    }

    tokio::time::sleep(preparation_time + std::time::Duration::from_millis(100)).await;
    let load = system.placement.current_load(restaurant.id).await.map_err(|e| e.to_string())?;
    info!(restaurant_id = %restaurant.id, load, "Load after preparation");

    system.shutdown().await
}
