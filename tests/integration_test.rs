use food_dispatch::config::DispatchConfig;
use food_dispatch::lifecycle::FoodOrderSystem;
use food_dispatch::model::{
    CustomerId, MenuItem, MenuItemCreate, MenuItemId, OrderItemRequest, OrderStatus,
    PinnedItemRequest, Restaurant, RestaurantCreate,
};
use food_dispatch::placement::PlacementError;
use food_dispatch::selector::SelectionStrategy;
use rust_decimal::Decimal;
use std::time::Duration;

fn config(preparation_ms: u64, processing_ms: u64) -> DispatchConfig {
    DispatchConfig {
        preparation_time_ms: preparation_ms,
        processing_time_ms: processing_ms,
        ..DispatchConfig::default()
    }
}

async fn restaurant_with(
    system: &FoodOrderSystem,
    name: &str,
    rating: Decimal,
    max_capacity: u32,
    dish: &str,
    price: i64,
) -> Restaurant {
    let restaurant = system
        .register_restaurant(RestaurantCreate::new(name, rating, max_capacity))
        .await
        .expect("Failed to register restaurant");
    system
        .add_menu_item(MenuItemCreate::new(restaurant.id, dish, Decimal::from(price)))
        .await
        .expect("Failed to add menu item");
    restaurant
}

fn pizzas(quantity: u32) -> Vec<OrderItemRequest> {
    vec![OrderItemRequest::new("Pizza", Decimal::from(10), quantity)]
}

/// Two restaurants offer the same dish; rating decides, and the preparation deadline
/// gives the capacity back.
#[tokio::test(start_paused = true)]
async fn test_order_routed_by_rating_and_released_at_deadline() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let a = restaurant_with(&system, "A", Decimal::new(45, 1), 5, "Pizza", 10).await;
    let b = restaurant_with(&system, "B", Decimal::new(30, 1), 5, "Pizza", 10).await;

    let order = system
        .place_order(pizzas(3), CustomerId(1), SelectionStrategy::HighestRating)
        .await
        .expect("Order should be placed");

    assert!(order.items.iter().all(|line| line.restaurant_id == a.id));
    assert_eq!(order.total_amount, Decimal::from(30));
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 3);
    assert_eq!(system.placement.current_load(b.id).await.unwrap(), 0);

    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 0);

    let stored = system
        .orders
        .get(order.id)
        .await
        .expect("Failed to get order")
        .expect("Order not found");
    assert_eq!(stored, order);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test(start_paused = true)]
async fn test_order_over_capacity_is_refused() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let a = restaurant_with(&system, "A", Decimal::from(4), 2, "Pizza", 10).await;

    let result = system
        .place_order(pizzas(3), CustomerId(1), SelectionStrategy::HighestRating)
        .await;

    assert!(matches!(
        result,
        Err(PlacementError::CapacityExceeded { restaurant_id, requested: 3, .. }) if restaurant_id == a.id
    ));
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 0);
    assert!(system.orders.find_all().await.unwrap().is_empty());

    system.shutdown().await.expect("Shutdown failed");
}

/// 3 + 3 > 5: of two concurrent orders exactly one is admitted.
#[tokio::test(start_paused = true)]
async fn test_concurrent_orders_never_overbook() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let a = restaurant_with(&system, "A", Decimal::from(4), 5, "Pizza", 10).await;

    let first = system.place_order(pizzas(3), CustomerId(1), SelectionStrategy::HighestRating);
    let second = system.place_order(pizzas(3), CustomerId(2), SelectionStrategy::HighestRating);
    let (first, second) = tokio::join!(first, second);

    let outcomes = [&first, &second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        outcomes
            .iter()
            .filter(|r| matches!(r, Err(PlacementError::CapacityExceeded { .. })))
            .count(),
        1
    );
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 3);

    system.shutdown().await.expect("Shutdown failed");
}

/// Capacity reserved after a deadline release must not be taken away by the late
/// worker of the earlier order.
#[tokio::test(start_paused = true)]
async fn test_late_worker_does_not_release_twice() {
    let system = FoodOrderSystem::new(config(3000, 5000));
    let a = restaurant_with(&system, "A", Decimal::from(4), 5, "Pizza", 10).await;

    system
        .place_order(pizzas(3), CustomerId(1), SelectionStrategy::HighestRating)
        .await
        .expect("First order should be placed");

    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 0);

    system
        .place_order(pizzas(4), CustomerId(2), SelectionStrategy::HighestRating)
        .await
        .expect("Second order should be placed");
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 4);

    // First order's worker finishes at 5s; second order's deadline is at ~6.1s.
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 4);

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 0);

    system.shutdown().await.expect("Shutdown failed");
}

/// A later bucket's refusal rolls back the reservations of earlier buckets.
#[tokio::test(start_paused = true)]
async fn test_multi_restaurant_order_is_all_or_nothing() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let pizzeria = restaurant_with(&system, "Pizzeria", Decimal::from(4), 5, "Pizza", 10).await;
    let sushi = restaurant_with(&system, "Sushi", Decimal::from(4), 2, "Maki", 8).await;

    let items = vec![
        OrderItemRequest::new("Pizza", Decimal::from(10), 2),
        OrderItemRequest::new("Maki", Decimal::from(8), 3),
    ];
    let result = system
        .place_order(items, CustomerId(1), SelectionStrategy::LowestCost)
        .await;

    assert!(matches!(
        result,
        Err(PlacementError::CapacityExceeded { restaurant_id, .. }) if restaurant_id == sushi.id
    ));
    assert_eq!(system.placement.current_load(pizzeria.id).await.unwrap(), 0);
    assert_eq!(system.placement.current_load(sushi.id).await.unwrap(), 0);

    // Both buckets fit: the order is split across the two restaurants.
    let items = vec![
        OrderItemRequest::new("Pizza", Decimal::from(10), 2),
        OrderItemRequest::new("Maki", Decimal::from(8), 2),
    ];
    let order = system
        .place_order(items, CustomerId(1), SelectionStrategy::LowestCost)
        .await
        .expect("Split order should be placed");
    assert_eq!(order.restaurants(), vec![pizzeria.id, sushi.id]);
    assert_eq!(order.total_amount, Decimal::from(36));
    assert_eq!(system.placement.current_load(pizzeria.id).await.unwrap(), 2);
    assert_eq!(system.placement.current_load(sushi.id).await.unwrap(), 2);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test(start_paused = true)]
async fn test_lowest_cost_uses_each_restaurants_price() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let _pricey = restaurant_with(&system, "Pricey", Decimal::from(5), 5, "Pizza", 14).await;
    let cheap = restaurant_with(&system, "Cheap", Decimal::from(2), 5, "Pizza", 9).await;

    let order = system
        .place_order(pizzas(1), CustomerId(1), SelectionStrategy::LowestCost)
        .await
        .expect("Order should be placed");
    assert_eq!(order.restaurants(), vec![cheap.id]);

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test(start_paused = true)]
async fn test_closed_restaurant_refuses_orders() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let a = restaurant_with(&system, "A", Decimal::from(4), 5, "Pizza", 10).await;

    let closed = system
        .set_open_status(a.id, false)
        .await
        .expect("Failed to close restaurant");
    assert!(!closed.is_open);
    let stored = system.restaurants.load(a.id).await.unwrap();
    let capacity = system.capacity(a.id).await.unwrap();
    assert_eq!(stored.is_open, capacity.is_open);
    assert!(!system.placement.can_place_order(a.id, 1).await.unwrap());

    let result = system
        .place_order(pizzas(1), CustomerId(1), SelectionStrategy::HighestRating)
        .await;
    assert_eq!(result, Err(PlacementError::Closed(a.id)));
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 0);

    system.set_open_status(a.id, true).await.expect("Failed to reopen");
    assert!(system.placement.can_place_order(a.id, 5).await.unwrap());
    assert!(!system.placement.can_place_order(a.id, 6).await.unwrap());

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test(start_paused = true)]
async fn test_manual_dispatch_lowers_load() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let a = restaurant_with(&system, "A", Decimal::from(4), 5, "Pizza", 10).await;

    system
        .place_order(pizzas(3), CustomerId(1), SelectionStrategy::HighestRating)
        .await
        .expect("Order should be placed");

    assert_eq!(system.placement.dispatch_order(a.id, 2).await.unwrap(), 1);
    assert_eq!(system.placement.dispatch_order(a.id, 2).await.unwrap(), 0);

    system.shutdown().await.expect("Shutdown failed");
}

/// Work released by hand is taken out of its reservation, so that reservation's
/// deadline cannot release it again while a later order holds the kitchen.
#[tokio::test(start_paused = true)]
async fn test_manual_dispatch_then_deadline_does_not_overbook() {
    let system = FoodOrderSystem::new(config(3000, 10_000));
    let a = restaurant_with(&system, "A", Decimal::from(4), 5, "Pizza", 10).await;

    system
        .place_order(pizzas(3), CustomerId(1), SelectionStrategy::HighestRating)
        .await
        .expect("First order should be placed");
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(system.placement.dispatch_order(a.id, 3).await.unwrap(), 0);

    system
        .place_order(pizzas(5), CustomerId(2), SelectionStrategy::HighestRating)
        .await
        .expect("Second order should be placed");

    // First order's deadline fires at 3s, second order's at 4s.
    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(system.placement.current_load(a.id).await.unwrap(), 5);

    let third = system
        .place_order(pizzas(3), CustomerId(3), SelectionStrategy::HighestRating)
        .await;
    assert!(matches!(third, Err(PlacementError::CapacityExceeded { load: 5, .. })));

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test]
async fn test_invalid_and_unknown_requests() {
    let system = FoodOrderSystem::new(config(50, 10));
    restaurant_with(&system, "A", Decimal::from(4), 5, "Pizza", 10).await;

    let empty = system
        .place_order(vec![], CustomerId(1), SelectionStrategy::HighestRating)
        .await;
    assert!(matches!(empty, Err(PlacementError::InvalidRequest(_))));

    let unknown = system
        .place_order(
            vec![OrderItemRequest::new("Ramen", Decimal::from(11), 1)],
            CustomerId(1),
            SelectionStrategy::HighestRating,
        )
        .await;
    assert_eq!(unknown, Err(PlacementError::NoOfferings("Ramen".to_string())));

    let strategy = "fastest".parse::<SelectionStrategy>().map_err(PlacementError::from);
    assert!(matches!(strategy, Err(PlacementError::InvalidRequest(_))));

    system.shutdown().await.expect("Shutdown failed");
}

#[tokio::test(start_paused = true)]
async fn test_removed_restaurant_is_no_longer_offered() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let a = restaurant_with(&system, "A", Decimal::from(4), 5, "Pizza", 10).await;

    system
        .remove_restaurant(a.id)
        .await
        .expect("Failed to remove restaurant");
    assert!(system.menus.find_by_restaurant(a.id).await.unwrap().is_empty());
    assert!(matches!(
        system.placement.current_load(a.id).await,
        Err(PlacementError::NotFound(_))
    ));

    let result = system
        .place_order(pizzas(1), CustomerId(1), SelectionStrategy::HighestRating)
        .await;
    assert_eq!(result, Err(PlacementError::NoOfferings("Pizza".to_string())));

    system.shutdown().await.expect("Shutdown failed");
}

async fn listing(system: &FoodOrderSystem, restaurant: &Restaurant) -> MenuItem {
    system
        .menus
        .find_by_restaurant(restaurant.id)
        .await
        .expect("Failed to read menu")
        .remove(0)
}

/// Pinned items skip selection: the lower-rated restaurant gets the order because the
/// customer chose it.
#[tokio::test(start_paused = true)]
async fn test_pinned_order_goes_to_the_chosen_restaurant() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let _best = restaurant_with(&system, "Best", Decimal::from(5), 5, "Pizza", 10).await;
    let chosen = restaurant_with(&system, "Chosen", Decimal::from(2), 5, "Pizza", 12).await;
    let pizza = listing(&system, &chosen).await;

    let order = system
        .place_pinned_order(vec![PinnedItemRequest::new(chosen.id, pizza.id, 2)], CustomerId(4))
        .await
        .expect("Pinned order should be placed");

    assert_eq!(order.restaurants(), vec![chosen.id]);
    assert_eq!(order.items[0].menu_item_id, pizza.id);
    assert_eq!(order.total_amount, Decimal::from(24));
    assert_eq!(system.placement.current_load(chosen.id).await.unwrap(), 2);

    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert_eq!(system.placement.current_load(chosen.id).await.unwrap(), 0);

    system.shutdown().await.expect("Shutdown failed");
}

/// Every pinned restaurant must fit before any is charged.
#[tokio::test(start_paused = true)]
async fn test_pinned_order_is_all_or_nothing() {
    let system = FoodOrderSystem::new(config(3000, 3000));
    let pizzeria = restaurant_with(&system, "Pizzeria", Decimal::from(4), 5, "Pizza", 10).await;
    let sushi = restaurant_with(&system, "Sushi", Decimal::from(4), 2, "Maki", 8).await;
    let pizza = listing(&system, &pizzeria).await;
    let maki = listing(&system, &sushi).await;

    let result = system
        .place_pinned_order(
            vec![
                PinnedItemRequest::new(pizzeria.id, pizza.id, 2),
                PinnedItemRequest::new(sushi.id, maki.id, 3),
            ],
            CustomerId(1),
        )
        .await;
    assert!(matches!(
        result,
        Err(PlacementError::CapacityExceeded { restaurant_id, .. }) if restaurant_id == sushi.id
    ));
    assert_eq!(system.placement.current_load(pizzeria.id).await.unwrap(), 0);
    assert_eq!(system.placement.current_load(sushi.id).await.unwrap(), 0);

    // Maki pinned to the pizzeria.
    let mismatch = system
        .place_pinned_order(vec![PinnedItemRequest::new(pizzeria.id, maki.id, 1)], CustomerId(1))
        .await;
    assert!(matches!(mismatch, Err(PlacementError::InvalidRequest(_))));

    let unknown = system
        .place_pinned_order(
            vec![PinnedItemRequest::new(pizzeria.id, MenuItemId(404), 1)],
            CustomerId(1),
        )
        .await;
    assert!(matches!(unknown, Err(PlacementError::NotFound(_))));

    let empty = system.place_pinned_order(vec![], CustomerId(1)).await;
    assert!(matches!(empty, Err(PlacementError::InvalidRequest(_))));

    assert!(system.orders.find_all().await.unwrap().is_empty());
    system.shutdown().await.expect("Shutdown failed");
}
