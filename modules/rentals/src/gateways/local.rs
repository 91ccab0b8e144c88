use async_trait::async_trait;
use query_core::{Page, PageParams};
use std::sync::Arc;

use crate::contract::{
    client::RentalsApi,
    error::RentalsError,
    model::{Customer, CustomerFilter, CustomerPatch, NewCustomer, NewRental, Rental},
};
use crate::domain::service::Service;

/// Local implementation of the RentalsApi trait that delegates to the domain service
pub struct RentalsLocalClient {
    service: Arc<Service>,
}

impl RentalsLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl RentalsApi for RentalsLocalClient {
    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, RentalsError> {
        self.service.create_customer(new).await.map_err(Into::into)
    }

    async fn get_customer(&self, id: i32) -> Result<Customer, RentalsError> {
        self.service.get_customer(id).await.map_err(Into::into)
    }

    async fn list_customers(
        &self,
        filter: CustomerFilter,
        page: PageParams,
    ) -> Result<Page<Customer>, RentalsError> {
        self.service
            .list_customers(filter, page)
            .await
            .map_err(Into::into)
    }

    async fn update_customer(
        &self,
        id: i32,
        patch: CustomerPatch,
    ) -> Result<Customer, RentalsError> {
        self.service
            .update_customer(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_customer(&self, id: i32) -> Result<(), RentalsError> {
        self.service.delete_customer(id).await.map_err(Into::into)
    }

    async fn open_rental(&self, new: NewRental) -> Result<Rental, RentalsError> {
        self.service.open_rental(new).await.map_err(Into::into)
    }

    async fn get_rental(&self, id: i32) -> Result<Rental, RentalsError> {
        self.service.get_rental(id).await.map_err(Into::into)
    }

    async fn close_rental(&self, id: i32) -> Result<Rental, RentalsError> {
        self.service.close_rental(id).await.map_err(Into::into)
    }

    async fn list_customer_rentals(&self, customer_id: i32) -> Result<Vec<Rental>, RentalsError> {
        self.service
            .list_customer_rentals(customer_id)
            .await
            .map_err(Into::into)
    }

    async fn list_rentals(&self, page: PageParams) -> Result<Page<Rental>, RentalsError> {
        self.service.list_rentals(page).await.map_err(Into::into)
    }
}
