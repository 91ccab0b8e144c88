use std::sync::Arc;

use query_core::{Page, PageParams};
use tracing::{info, instrument};

use crate::config::RentalsConfig;
use crate::contract::model::{
    Customer, CustomerFilter, CustomerPatch, NewCustomer, NewRental, Rental,
};
use crate::domain::customers::Customers;
use crate::domain::error::DomainError;
use crate::domain::rentals::Rentals;
use crate::domain::repo::{CustomersRepository, RentalsRepository};

/// Facade over customer records and the rental lifecycle.
/// Depends only on the repository ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    customers: Customers,
    rentals: Rentals,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceConfig {
    pub customer_page_size: u64,
    pub rental_page_size: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let cfg = RentalsConfig::default();
        Self::from(&cfg)
    }
}

impl From<&RentalsConfig> for ServiceConfig {
    fn from(cfg: &RentalsConfig) -> Self {
        Self {
            customer_page_size: cfg.customer_page_size,
            rental_page_size: cfg.rental_page_size,
        }
    }
}

impl Service {
    pub fn new(
        customers: Arc<dyn CustomersRepository>,
        rentals: Arc<dyn RentalsRepository>,
        config: ServiceConfig,
    ) -> Self {
        Self {
            customers: Customers::new(customers),
            rentals: Rentals::new(rentals),
            config,
        }
    }

    pub fn config(&self) -> ServiceConfig {
        self.config
    }

    #[instrument(name = "rentals.service.create_customer", skip(self, new))]
    pub async fn create_customer(&self, new: NewCustomer) -> Result<Customer, DomainError> {
        let customer = self.customers.create(new).await?;
        info!(customer_id = customer.customer_id, "customer created");
        Ok(customer)
    }

    #[instrument(name = "rentals.service.get_customer", skip(self), fields(customer_id = id))]
    pub async fn get_customer(&self, id: i32) -> Result<Customer, DomainError> {
        self.customers.get(id).await
    }

    #[instrument(name = "rentals.service.list_customers", skip(self))]
    pub async fn list_customers(
        &self,
        filter: CustomerFilter,
        page: PageParams,
    ) -> Result<Page<Customer>, DomainError> {
        let req = page.resolve(self.config.customer_page_size)?;
        self.customers.list(&filter, req).await
    }

    #[instrument(
        name = "rentals.service.update_customer",
        skip(self, patch),
        fields(customer_id = id)
    )]
    pub async fn update_customer(
        &self,
        id: i32,
        patch: CustomerPatch,
    ) -> Result<Customer, DomainError> {
        if patch.is_empty() {
            return Err(DomainError::validation(
                "body",
                "at least one customer field is required",
            ));
        }
        let customer = self.customers.update(id, patch).await?;
        info!("customer updated");
        Ok(customer)
    }

    #[instrument(name = "rentals.service.delete_customer", skip(self), fields(customer_id = id))]
    pub async fn delete_customer(&self, id: i32) -> Result<(), DomainError> {
        self.customers.delete(id).await?;
        info!("customer deleted");
        Ok(())
    }

    #[instrument(name = "rentals.service.open_rental", skip(self))]
    pub async fn open_rental(&self, new: NewRental) -> Result<Rental, DomainError> {
        let rental = self.rentals.open(new).await?;
        info!(rental_id = rental.rental_id, "rental opened");
        Ok(rental)
    }

    #[instrument(name = "rentals.service.get_rental", skip(self), fields(rental_id = id))]
    pub async fn get_rental(&self, id: i32) -> Result<Rental, DomainError> {
        self.rentals.get(id).await
    }

    #[instrument(name = "rentals.service.close_rental", skip(self), fields(rental_id = id))]
    pub async fn close_rental(&self, id: i32) -> Result<Rental, DomainError> {
        let rental = self.rentals.close(id).await?;
        info!("rental returned");
        Ok(rental)
    }

    #[instrument(name = "rentals.service.list_customer_rentals", skip(self))]
    pub async fn list_customer_rentals(&self, customer_id: i32) -> Result<Vec<Rental>, DomainError> {
        self.rentals.list_by_customer(customer_id).await
    }

    #[instrument(name = "rentals.service.list_rentals", skip(self))]
    pub async fn list_rentals(&self, page: PageParams) -> Result<Page<Rental>, DomainError> {
        let req = page.resolve(self.config.rental_page_size)?;
        self.rentals.list(req).await
    }
}
