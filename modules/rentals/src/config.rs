use serde::{Deserialize, Serialize};

/// Configuration for the rentals module (`modules.rentals`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RentalsConfig {
    /// Default `limit` for customer listings.
    #[serde(default = "default_customer_page_size")]
    pub customer_page_size: u64,
    /// Default `limit` for rental listings.
    #[serde(default = "default_rental_page_size")]
    pub rental_page_size: u64,
    /// Create the `customer` and `rental` tables on startup when missing.
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,
}

impl Default for RentalsConfig {
    fn default() -> Self {
        Self {
            customer_page_size: default_customer_page_size(),
            rental_page_size: default_rental_page_size(),
            auto_migrate: default_auto_migrate(),
        }
    }
}

fn default_customer_page_size() -> u64 {
    700
}

fn default_rental_page_size() -> u64 {
    50
}

fn default_auto_migrate() -> bool {
    true
}
