//! # Order Store
//!
//! Persists placed orders. The store computes the total and stamps the status, so a
//! saved order is always internally consistent.

use crate::framework::{StoreActor, StoreClient, StoreEntity};
use crate::model::{CustomerId, Order, OrderCreate, OrderId, OrderStatus, ValidationError};
use crate::stores::StoreError;
use rust_decimal::Decimal;
use std::convert::Infallible;
use tracing::{info, instrument};

impl StoreEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = Infallible;
    type Error = ValidationError;

    fn from_create(id: OrderId, params: OrderCreate) -> Result<Self, ValidationError> {
        if params.items.is_empty() {
            return Err(ValidationError::Empty("order items"));
        }
        let mut total_amount = Decimal::ZERO;
        for item in &params.items {
            if item.quantity == 0 {
                return Err(ValidationError::ZeroQuantity);
            }
            if item.price <= Decimal::ZERO {
                return Err(ValidationError::NonPositivePrice(item.price));
            }
            total_amount += item.price * Decimal::from(item.quantity);
        }
        Ok(Self {
            id,
            customer_id: params.customer_id,
            total_amount,
            status: OrderStatus::Pending,
            items: params.items,
        })
    }

    fn apply_update(&mut self, update: Infallible) -> Result<(), ValidationError> {
        match update {}
    }
}

/// Client for the order store.
#[derive(Clone)]
pub struct OrderStore {
    inner: StoreClient<Order>,
}

impl OrderStore {
    pub fn new(inner: StoreClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(customer_id = %params.customer_id, lines = params.items.len()))]
    pub async fn save(&self, params: OrderCreate) -> Result<Order, StoreError> {
        let order = self.inner.save(params).await?;
        info!(order_id = %order.id, total = %order.total_amount, "Order persisted");
        Ok(order)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.inner.get(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_by_customer(&self, customer_id: CustomerId) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .inner
            .query("by_customer", move |o: &Order| o.customer_id == customer_id)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self) -> Result<Vec<Order>, StoreError> {
        Ok(self.inner.query("all", |_: &Order| true).await?)
    }
}

/// Creates the order store actor and its client.
pub fn new(buffer_size: usize) -> (StoreActor<Order>, OrderStore) {
    let (actor, client) = StoreActor::new(buffer_size);
    (actor, OrderStore::new(client))
}
