use query_core::PageError;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Customer with id {id} was not found")]
    CustomerNotFound { id: i32 },

    #[error("Rental with id {id} was not found")]
    RentalNotFound { id: i32 },

    #[error("Rental with id {id} was already returned")]
    AlreadyReturned { id: i32 },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid pagination: {0}")]
    InvalidPagination(#[from] PageError),

    #[error("Storage failure: {message}")]
    Storage { message: String },
}

impl DomainError {
    pub fn customer_not_found(id: i32) -> Self {
        Self::CustomerNotFound { id }
    }

    pub fn rental_not_found(id: i32) -> Self {
        Self::RentalNotFound { id }
    }

    pub fn already_returned(id: i32) -> Self {
        Self::AlreadyReturned { id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Storage failure. The full cause chain goes to the log; callers only
    /// see the outermost context, e.g. "query customers failed".
    pub fn storage(e: anyhow::Error) -> Self {
        tracing::error!(error = %format!("{e:#}"), "storage failure");
        Self::Storage {
            message: e.to_string(),
        }
    }
}
