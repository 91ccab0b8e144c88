use thiserror::Error;

use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RentalsError {
    #[error("Customer not found: {id}")]
    CustomerNotFound { id: i32 },

    #[error("Rental not found: {id}")]
    RentalNotFound { id: i32 },

    #[error("Rental {id} was already returned")]
    AlreadyReturned { id: i32 },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl RentalsError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<DomainError> for RentalsError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::CustomerNotFound { id } => Self::CustomerNotFound { id },
            DomainError::RentalNotFound { id } => Self::RentalNotFound { id },
            DomainError::AlreadyReturned { id } => Self::AlreadyReturned { id },
            DomainError::Validation { field, message } => {
                Self::validation(format!("{field}: {message}"))
            }
            DomainError::InvalidPagination(p) => Self::validation(p.to_string()),
            DomainError::Storage { message } => Self::Unavailable { message },
        }
    }
}
