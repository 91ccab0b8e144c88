//! Customer record rules: timestamps, defaults and partial updates.

use std::sync::Arc;

use query_core::{Page, PageRequest};
use tracing::debug;

use super::{error::DomainError, now, repo::CustomerInsert, repo::CustomersRepository};
use crate::contract::model::{Customer, CustomerFilter, CustomerPatch, NewCustomer};

#[derive(Clone)]
pub struct Customers {
    repo: Arc<dyn CustomersRepository>,
}

impl Customers {
    pub fn new(repo: Arc<dyn CustomersRepository>) -> Self {
        Self { repo }
    }

    /// `create_date` and `last_update` get the same instant.
    pub async fn create(&self, new: NewCustomer) -> Result<Customer, DomainError> {
        let ts = now();
        let row = CustomerInsert {
            store_id: new.store_id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            address_id: new.address_id,
            active: new.active.unwrap_or(true),
            create_date: ts,
            last_update: ts,
        };
        let id = self
            .repo
            .insert(row.clone())
            .await
            .map_err(DomainError::storage)?;
        debug!(customer_id = id, "customer inserted");

        Ok(Customer {
            customer_id: id,
            store_id: row.store_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            address_id: row.address_id,
            active: row.active,
            create_date: row.create_date,
            last_update: row.last_update,
        })
    }

    pub async fn get(&self, id: i32) -> Result<Customer, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(DomainError::storage)?
            .ok_or_else(|| DomainError::customer_not_found(id))
    }

    pub async fn list(
        &self,
        filter: &CustomerFilter,
        req: PageRequest,
    ) -> Result<Page<Customer>, DomainError> {
        self.repo
            .query(filter, req)
            .await
            .map_err(DomainError::storage)
    }

    /// Applies only the fields present in `patch`; `last_update` always moves.
    pub async fn update(&self, id: i32, patch: CustomerPatch) -> Result<Customer, DomainError> {
        let mut current = self.get(id).await?;

        // Never step behind the stored value, even if the clock does.
        let ts = now().max(current.last_update);
        let found = self
            .repo
            .update(id, &patch, ts)
            .await
            .map_err(DomainError::storage)?;
        if !found {
            return Err(DomainError::customer_not_found(id));
        }

        patch.apply_to(&mut current);
        current.last_update = ts;
        Ok(current)
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let deleted = self.repo.delete(id).await.map_err(DomainError::storage)?;
        if !deleted {
            return Err(DomainError::customer_not_found(id));
        }
        Ok(())
    }
}
