//! # Customer Store

use crate::framework::{StoreActor, StoreClient, StoreEntity};
use crate::model::{Customer, CustomerCreate, CustomerId, CustomerUpdate, ValidationError};
use crate::stores::StoreError;
use tracing::instrument;

impl StoreEntity for Customer {
    type Id = CustomerId;
    type Create = CustomerCreate;
    type Update = CustomerUpdate;
    type Error = ValidationError;

    fn from_create(id: CustomerId, params: CustomerCreate) -> Result<Self, ValidationError> {
        if params.name.trim().is_empty() {
            return Err(ValidationError::Empty("customer name"));
        }
        Ok(Self {
            id,
            name: params.name,
            email: params.email,
        })
    }

    fn apply_update(&mut self, update: CustomerUpdate) -> Result<(), ValidationError> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(ValidationError::Empty("customer name"));
            }
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        Ok(())
    }
}

/// Client for the customer store.
#[derive(Clone)]
pub struct CustomerStore {
    inner: StoreClient<Customer>,
}

impl CustomerStore {
    pub fn new(inner: StoreClient<Customer>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn save(&self, params: CustomerCreate) -> Result<Customer, StoreError> {
        Ok(self.inner.save(params).await?)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.inner.get(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn update(&self, id: CustomerId, update: CustomerUpdate) -> Result<Customer, StoreError> {
        Ok(self.inner.update(id, update).await?)
    }
}

/// Creates the customer store actor and its client.
pub fn new(buffer_size: usize) -> (StoreActor<Customer>, CustomerStore) {
    let (actor, client) = StoreActor::new(buffer_size);
    (actor, CustomerStore::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_keeps_record_on_rejection() {
        let (actor, customers) = new(8);
        tokio::spawn(actor.run());

        let alice = customers
            .save(CustomerCreate::new("Alice", "alice@example.com"))
            .await
            .unwrap();
        let updated = customers
            .update(
                alice.id,
                CustomerUpdate {
                    name: None,
                    email: Some("alice@example.org".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "alice@example.org");

        let err = customers
            .update(
                alice.id,
                CustomerUpdate {
                    name: Some("  ".to_string()),
                    email: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert_eq!(customers.get(alice.id).await.unwrap().unwrap().name, "Alice");
    }
}
