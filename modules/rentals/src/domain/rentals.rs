//! Rental lifecycle: `Open` -> `Returned`, exactly once.

use std::sync::Arc;

use chrono::NaiveDateTime;
use query_core::{Page, PageRequest};
use tracing::{debug, warn};

use super::{error::DomainError, now, repo::RentalInsert, repo::RentalsRepository};
use crate::contract::model::{NewRental, Rental};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalState {
    Open,
    Returned,
}

impl RentalState {
    pub fn of(r: &Rental) -> Self {
        if r.is_open() {
            Self::Open
        } else {
            Self::Returned
        }
    }
}

/// Return timestamp for a rental opened at `rental_date`: never earlier.
pub fn return_timestamp(rental_date: NaiveDateTime, now: NaiveDateTime) -> NaiveDateTime {
    now.max(rental_date)
}

#[derive(Clone)]
pub struct Rentals {
    repo: Arc<dyn RentalsRepository>,
}

impl Rentals {
    pub fn new(repo: Arc<dyn RentalsRepository>) -> Self {
        Self { repo }
    }

    pub async fn open(&self, new: NewRental) -> Result<Rental, DomainError> {
        let ts = now();
        let row = RentalInsert {
            inventory_id: new.inventory_id,
            customer_id: new.customer_id,
            staff_id: new.staff_id,
            rental_date: ts,
            last_update: ts,
        };
        let id = self.repo.insert(row).await.map_err(DomainError::storage)?;
        debug!(rental_id = id, "rental opened");

        Ok(Rental {
            rental_id: id,
            rental_date: ts,
            inventory_id: row.inventory_id,
            customer_id: row.customer_id,
            return_date: None,
            staff_id: row.staff_id,
            last_update: ts,
        })
    }

    /// The read only classifies the failure (missing vs. already returned);
    /// the conditional write is what decides the race.
    pub async fn close(&self, id: i32) -> Result<Rental, DomainError> {
        let current = self.get(id).await?;
        if RentalState::of(&current) == RentalState::Returned {
            return Err(DomainError::already_returned(id));
        }

        let returned_at = return_timestamp(current.rental_date, now());
        let closed = self
            .repo
            .close_if_open(id, returned_at)
            .await
            .map_err(DomainError::storage)?;
        if !closed {
            warn!(rental_id = id, "rental closed concurrently");
            return Err(DomainError::already_returned(id));
        }

        Ok(Rental {
            return_date: Some(returned_at),
            last_update: returned_at,
            ..current
        })
    }

    pub async fn get(&self, id: i32) -> Result<Rental, DomainError> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(DomainError::storage)?
            .ok_or_else(|| DomainError::rental_not_found(id))
    }

    pub async fn list_by_customer(&self, customer_id: i32) -> Result<Vec<Rental>, DomainError> {
        self.repo
            .list_by_customer(customer_id)
            .await
            .map_err(DomainError::storage)
    }

    pub async fn list(&self, req: PageRequest) -> Result<Page<Rental>, DomainError> {
        self.repo.query(req).await.map_err(DomainError::storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn return_timestamp_never_precedes_rental_date() {
        assert_eq!(return_timestamp(at(10, 0), at(11, 0)), at(11, 0));
        // clock skew: "now" before the stored rental_date
        assert_eq!(return_timestamp(at(10, 0), at(9, 0)), at(10, 0));
    }

    #[test]
    fn state_follows_return_date() {
        let mut r = Rental {
            rental_id: 1,
            rental_date: at(10, 0),
            inventory_id: 1,
            customer_id: 1,
            return_date: None,
            staff_id: 1,
            last_update: at(10, 0),
        };
        assert_eq!(RentalState::of(&r), RentalState::Open);
        r.return_date = Some(at(12, 0));
        assert_eq!(RentalState::of(&r), RentalState::Returned);
    }
}
