//! Storage port: the persistence operations the domain needs. Owns no rules.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use query_core::{Page, PageRequest};

use crate::contract::model::{Customer, CustomerFilter, CustomerPatch, Rental};

/// Fully-formed customer row; the domain assigns timestamps and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInsert {
    pub store_id: Option<i32>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub address_id: Option<i32>,
    pub active: bool,
    pub create_date: NaiveDateTime,
    pub last_update: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalInsert {
    pub inventory_id: i32,
    pub customer_id: i32,
    pub staff_id: i32,
    pub rental_date: NaiveDateTime,
    pub last_update: NaiveDateTime,
}

#[async_trait]
pub trait CustomersRepository: Send + Sync {
    /// Insert and return the assigned `customer_id`.
    async fn insert(&self, c: CustomerInsert) -> anyhow::Result<i32>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Customer>>;
    /// Filtered page ordered by `customer_id`, with the total match count.
    async fn query(&self, filter: &CustomerFilter, req: PageRequest)
        -> anyhow::Result<Page<Customer>>;
    /// Write the present fields of `patch` plus `last_update`.
    /// Returns false if no such customer exists.
    async fn update(
        &self,
        id: i32,
        patch: &CustomerPatch,
        last_update: NaiveDateTime,
    ) -> anyhow::Result<bool>;
    /// Returns true if a row was deleted.
    async fn delete(&self, id: i32) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait RentalsRepository: Send + Sync {
    /// Insert and return the assigned `rental_id`.
    async fn insert(&self, r: RentalInsert) -> anyhow::Result<i32>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Rental>>;
    /// Every rental of `customer_id`, ordered by `rental_id`.
    async fn list_by_customer(&self, customer_id: i32) -> anyhow::Result<Vec<Rental>>;
    async fn query(&self, req: PageRequest) -> anyhow::Result<Page<Rental>>;
    /// Single conditional write: sets `return_date` and `last_update` to
    /// `returned_at` only where `return_date IS NULL`. True if a row changed.
    async fn close_if_open(&self, id: i32, returned_at: NaiveDateTime) -> anyhow::Result<bool>;
}
