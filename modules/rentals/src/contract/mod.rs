pub mod client;
pub mod error;
pub mod model;

pub use client::RentalsApi;
pub use error::RentalsError;
pub use model::{Customer, CustomerFilter, CustomerPatch, NewCustomer, NewRental, Rental};
