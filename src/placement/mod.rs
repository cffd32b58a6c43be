//! # Order Placement
//!
//! End-to-end handling of a customer order:
//!
//! 1. validate the requested items;
//! 2. split them into per-restaurant buckets with the [`OrderGrouper`];
//! 3. reserve capacity for every bucket, in restaurant id order;
//! 4. hand every bucket to the [`DispatchScheduler`];
//! 5. persist the order.
//!
//! Step 3 is all-or-nothing across buckets. If any restaurant refuses, the reservations
//! already taken by the same order are released and nothing is dispatched, so a failed
//! placement leaves every restaurant's load as it found it.
//!
//! [`OrderPlacement::place_pinned_order`] takes items the customer already assigned to
//! restaurants and skips selection in step 2; steps 3 to 5 are the same.
//!
//! Placement runs on its own task; both entry points return a [`PendingOrder`] that
//! resolves to the saved [`Order`].

pub mod error;

pub use error::PlacementError;

use crate::dispatch::DispatchScheduler;
use crate::grouper::{Buckets, OrderGrouper};
use crate::ledger::{CapacityLedger, Reservation};
use crate::model::{
    CustomerId, Order, OrderCreate, OrderItem, OrderItemRequest, PinnedItemRequest, RestaurantId,
};
use crate::selector::SelectionStrategy;
use crate::stores::OrderStore;
use rust_decimal::Decimal;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, instrument, warn, Instrument};

/// An order being placed in the background.
///
/// Awaiting it yields the persisted order or the reason placement failed. Dropping it
/// does not cancel the placement.
#[must_use = "a pending order reports its outcome only when awaited"]
pub struct PendingOrder {
    task: JoinHandle<Result<Order, PlacementError>>,
}

impl Future for PendingOrder {
    type Output = Result<Order, PlacementError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.task).poll(cx).map(|joined| match joined {
            Ok(result) => result,
            Err(e) => Err(PlacementError::Internal(format!("placement task failed: {e}"))),
        })
    }
}

struct Inner {
    grouper: OrderGrouper,
    orders: OrderStore,
    ledger: Arc<CapacityLedger>,
    scheduler: Arc<DispatchScheduler>,
}

/// The order placement service. Cheap to clone.
#[derive(Clone)]
pub struct OrderPlacement {
    inner: Arc<Inner>,
}

impl OrderPlacement {
    pub fn new(
        grouper: OrderGrouper,
        orders: OrderStore,
        ledger: Arc<CapacityLedger>,
        scheduler: Arc<DispatchScheduler>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                grouper,
                orders,
                ledger,
                scheduler,
            }),
        }
    }

    /// Starts placing an order and returns immediately.
    pub fn place_order(
        &self,
        items: Vec<OrderItemRequest>,
        customer_id: CustomerId,
        strategy: SelectionStrategy,
    ) -> PendingOrder {
        let this = self.clone();
        let span = info_span!("place_order", %customer_id, %strategy, items = items.len());
        spawn_placement(
            async move { this.place(items, customer_id, strategy).await },
            span,
        )
    }

    /// Starts placing an order whose items are already pinned to restaurants.
    pub fn place_pinned_order(
        &self,
        items: Vec<PinnedItemRequest>,
        customer_id: CustomerId,
    ) -> PendingOrder {
        let this = self.clone();
        let span = info_span!("place_pinned_order", %customer_id, items = items.len());
        spawn_placement(
            async move { this.place_pinned(items, customer_id).await },
            span,
        )
    }

    async fn place(
        &self,
        items: Vec<OrderItemRequest>,
        customer_id: CustomerId,
        strategy: SelectionStrategy,
    ) -> Result<Order, PlacementError> {
        validate(&items)?;
        let buckets = self.inner.grouper.group_by_restaurant(items, strategy).await?;
        self.commit(buckets, customer_id).await
    }

    async fn place_pinned(
        &self,
        items: Vec<PinnedItemRequest>,
        customer_id: CustomerId,
    ) -> Result<Order, PlacementError> {
        if items.is_empty() {
            return Err(PlacementError::InvalidRequest("order has no items".to_string()));
        }
        if let Some(item) = items.iter().find(|item| item.quantity == 0) {
            return Err(PlacementError::InvalidRequest(format!(
                "quantity of {} must be at least 1",
                item.menu_item_id
            )));
        }
        let buckets = self.inner.grouper.group_pinned(items).await?;
        self.commit(buckets, customer_id).await
    }

    /// Reserves, submits and persists grouped buckets.
    async fn commit(&self, buckets: Buckets, customer_id: CustomerId) -> Result<Order, PlacementError> {
        let lines = order_lines(&buckets)?;
        let reservations = self.reserve_all(&buckets).await?;

        let mut pending = reservations.into_iter().zip(buckets.into_values());
        while let Some((reservation, bucket)) = pending.next() {
            if let Err(e) = self.inner.scheduler.submit(reservation, bucket).await {
                // Buckets already queued keep their worker and deadline releases.
                for (unsent, _) in pending.by_ref() {
                    self.inner.ledger.release(&unsent).await;
                }
                return Err(e.into());
            }
        }

        let order = self
            .inner
            .orders
            .save(OrderCreate {
                customer_id,
                items: lines,
            })
            .await?;
        Ok(order)
    }

    /// Reserves every bucket or none of them.
    async fn reserve_all(&self, buckets: &Buckets) -> Result<Vec<Reservation>, PlacementError> {
        let mut taken: Vec<Reservation> = Vec::with_capacity(buckets.len());
        for (restaurant_id, bucket) in buckets {
            let outcome = match item_count(bucket) {
                Some(count) => self
                    .inner
                    .ledger
                    .reserve(*restaurant_id, count)
                    .await
                    .map_err(PlacementError::from),
                None => Err(PlacementError::InvalidRequest(format!(
                    "too many items for {restaurant_id}"
                ))),
            };
            match outcome {
                Ok(reservation) => taken.push(reservation),
                Err(e) => {
                    for reservation in &taken {
                        self.inner.ledger.release(reservation).await;
                    }
                    debug!(rolled_back = taken.len(), "Reservations rolled back");
                    return Err(e);
                }
            }
        }
        Ok(taken)
    }

    /// Whether `restaurant_id` would admit `count` more items right now.
    #[instrument(skip(self))]
    pub async fn can_place_order(
        &self,
        restaurant_id: RestaurantId,
        count: u32,
    ) -> Result<bool, PlacementError> {
        Ok(self.inner.ledger.can_accept(restaurant_id, count).await?)
    }

    /// Marks `count` items of `restaurant_id` as done, lowering its load without a
    /// reservation. Returns the new load.
    #[instrument(skip(self))]
    pub async fn dispatch_order(
        &self,
        restaurant_id: RestaurantId,
        count: u32,
    ) -> Result<u32, PlacementError> {
        Ok(self.inner.ledger.release_count(restaurant_id, count).await?)
    }

    pub async fn current_load(&self, restaurant_id: RestaurantId) -> Result<u32, PlacementError> {
        Ok(self.inner.ledger.current_load(restaurant_id).await?)
    }
}

fn spawn_placement(
    placement: impl Future<Output = Result<Order, PlacementError>> + Send + 'static,
    span: tracing::Span,
) -> PendingOrder {
    let task = tokio::spawn(
        async move {
            let result = placement.await;
            match &result {
                Ok(order) => info!(order_id = %order.id, total = %order.total_amount, "Order placed"),
                Err(e) => warn!(error = %e, "Order rejected"),
            }
            result
        }
        .instrument(span),
    );
    PendingOrder { task }
}

fn validate(items: &[OrderItemRequest]) -> Result<(), PlacementError> {
    if items.is_empty() {
        return Err(PlacementError::InvalidRequest("order has no items".to_string()));
    }
    for item in items {
        if item.quantity == 0 {
            return Err(PlacementError::InvalidRequest(format!(
                "quantity of {} must be at least 1",
                item.name
            )));
        }
        if item.price <= Decimal::ZERO {
            return Err(PlacementError::InvalidRequest(format!(
                "price of {} must be positive",
                item.name
            )));
        }
    }
    Ok(())
}

/// Sum of quantities, or `None` on overflow.
fn item_count(bucket: &[OrderItemRequest]) -> Option<u32> {
    bucket
        .iter()
        .try_fold(0u32, |count, item| count.checked_add(item.quantity))
}

fn order_lines(buckets: &Buckets) -> Result<Vec<OrderItem>, PlacementError> {
    let mut lines = Vec::new();
    for (restaurant_id, bucket) in buckets {
        for item in bucket {
            let menu_item_id = item.menu_item_id.ok_or_else(|| {
                PlacementError::Internal(format!("{} was not resolved to a menu item", item.name))
            })?;
            lines.push(OrderItem {
                menu_item_id,
                restaurant_id: *restaurant_id,
                quantity: item.quantity,
                price: item.price,
            });
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MenuItemId;

    #[test]
    fn test_validate_rejects_bad_lines() {
        assert!(matches!(validate(&[]), Err(PlacementError::InvalidRequest(_))));
        assert!(matches!(
            validate(&[OrderItemRequest::new("Tea", Decimal::from(2), 0)]),
            Err(PlacementError::InvalidRequest(_))
        ));
        assert!(matches!(
            validate(&[OrderItemRequest::new("Tea", Decimal::ZERO, 1)]),
            Err(PlacementError::InvalidRequest(_))
        ));
        assert!(validate(&[OrderItemRequest::new("Tea", Decimal::new(250, 2), 1)]).is_ok());
    }

    #[test]
    fn test_item_count_sums_quantities() {
        let bucket = vec![
            OrderItemRequest::new("Tea", Decimal::from(2), 2),
            OrderItemRequest::new("Cake", Decimal::from(4), 3),
        ];
        assert_eq!(item_count(&bucket), Some(5));

        let huge = vec![
            OrderItemRequest::new("Tea", Decimal::from(2), u32::MAX),
            OrderItemRequest::new("Cake", Decimal::from(4), 1),
        ];
        assert_eq!(item_count(&huge), None);
    }

    #[test]
    fn test_order_lines_follow_buckets() {
        let mut tea = OrderItemRequest::new("Tea", Decimal::from(2), 2);
        tea.menu_item_id = Some(MenuItemId(3));
        let mut buckets = Buckets::new();
        buckets.insert(RestaurantId(9), vec![tea]);

        let lines = order_lines(&buckets).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].restaurant_id, RestaurantId(9));
        assert_eq!(lines[0].menu_item_id, MenuItemId(3));
    }
}
