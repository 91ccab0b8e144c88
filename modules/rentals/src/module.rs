use std::sync::Arc;

use anyhow::Context;
use db::DbHandle;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::RentalsConfig;
use crate::contract::client::RentalsApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::RentalsLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::{SeaOrmCustomersRepository, SeaOrmRentalsRepository};

/// Wires the rentals module: storage, domain service, REST routes and the
/// in-process client.
#[derive(Clone)]
pub struct RentalsModule {
    service: Arc<Service>,
}

impl RentalsModule {
    pub const NAME: &'static str = "rentals";

    /// Build the module on top of an open database handle.
    pub async fn init(db: &DbHandle, cfg: &RentalsConfig) -> anyhow::Result<Self> {
        info!("Initializing rentals module");
        debug!(
            "Loaded rentals config: customer_page_size={}, rental_page_size={}, auto_migrate={}",
            cfg.customer_page_size, cfg.rental_page_size, cfg.auto_migrate
        );

        let conn = db.sea();
        if cfg.auto_migrate {
            migrate(&conn).await?;
        }
        Ok(Self::with_connection(conn, cfg))
    }

    /// Wire repositories over an existing SeaORM connection. No migrations.
    pub fn with_connection(conn: DatabaseConnection, cfg: &RentalsConfig) -> Self {
        let customers = SeaOrmCustomersRepository::new(conn.clone());
        let rentals = SeaOrmRentalsRepository::new(conn);
        let service = Service::new(
            Arc::new(customers),
            Arc::new(rentals),
            ServiceConfig::from(cfg),
        );
        Self {
            service: Arc::new(service),
        }
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn RentalsApi> {
        Arc::new(RentalsLocalClient::new(self.service.clone()))
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering rentals REST routes");
        routes::register_routes(router, self.service.clone())
    }
}

/// Create the `customer` and `rental` tables when missing.
pub async fn migrate(conn: &DatabaseConnection) -> anyhow::Result<()> {
    info!("Running rentals database migrations");
    Migrator::up(conn, None)
        .await
        .context("rentals migrations failed")?;
    info!("Rentals database migrations completed successfully");
    Ok(())
}
