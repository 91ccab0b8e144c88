pub mod customer;
pub mod rental;
