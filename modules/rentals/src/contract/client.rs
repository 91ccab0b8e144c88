use async_trait::async_trait;
use query_core::{Page, PageParams};

use crate::contract::{
    error::RentalsError,
    model::{Customer, CustomerFilter, CustomerPatch, NewCustomer, NewRental, Rental},
};

/// In-process API of the rentals module.
#[async_trait]
pub trait RentalsApi: Send + Sync {
    async fn create_customer(&self, new: NewCustomer) -> Result<Customer, RentalsError>;

    async fn get_customer(&self, id: i32) -> Result<Customer, RentalsError>;

    /// Filtered, id-ordered window over customers.
    async fn list_customers(
        &self,
        filter: CustomerFilter,
        page: PageParams,
    ) -> Result<Page<Customer>, RentalsError>;

    async fn update_customer(&self, id: i32, patch: CustomerPatch)
        -> Result<Customer, RentalsError>;

    async fn delete_customer(&self, id: i32) -> Result<(), RentalsError>;

    async fn open_rental(&self, new: NewRental) -> Result<Rental, RentalsError>;

    async fn get_rental(&self, id: i32) -> Result<Rental, RentalsError>;

    /// Mark an open rental returned. Fails with `AlreadyReturned` otherwise.
    async fn close_rental(&self, id: i32) -> Result<Rental, RentalsError>;

    async fn list_customer_rentals(&self, customer_id: i32) -> Result<Vec<Rental>, RentalsError>;

    async fn list_rentals(&self, page: PageParams) -> Result<Page<Rental>, RentalsError>;
}
