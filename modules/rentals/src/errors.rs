//! Error catalog for the rentals HTTP surface.
//!
//! Codes are stable and versioned; clients match on `code`, never on `title`.

use apikit::{ErrDef, Problem, ProblemResponse};

/// Strongly-typed error codes from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// rentals.request.validation.v1
    RequestValidation,
    /// rentals.request.invalid_pagination.v1
    RequestInvalidPagination,
    /// rentals.customer.not_found.v1
    CustomerNotFound,
    /// rentals.rental.not_found.v1
    RentalNotFound,
    /// rentals.rental.already_returned.v1
    RentalAlreadyReturned,
    /// rentals.storage.unavailable.v1
    StorageUnavailable,
}

macro_rules! def {
    ($status:literal, $title:literal, $code:literal) => {
        ErrDef {
            status: $status,
            title: $title,
            code: $code,
            type_url: concat!("https://errors.rentdesk.dev/", $code),
        }
    };
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 6] = [
        ErrorCode::RequestValidation,
        ErrorCode::RequestInvalidPagination,
        ErrorCode::CustomerNotFound,
        ErrorCode::RentalNotFound,
        ErrorCode::RentalAlreadyReturned,
        ErrorCode::StorageUnavailable,
    ];

    /// Get the error definition for this error code
    pub const fn def(&self) -> ErrDef {
        match self {
            ErrorCode::RequestValidation => {
                def!(400, "Validation Failed", "rentals.request.validation.v1")
            }
            ErrorCode::RequestInvalidPagination => def!(
                400,
                "Invalid Pagination",
                "rentals.request.invalid_pagination.v1"
            ),
            ErrorCode::CustomerNotFound => {
                def!(404, "Customer Not Found", "rentals.customer.not_found.v1")
            }
            ErrorCode::RentalNotFound => {
                def!(404, "Rental Not Found", "rentals.rental.not_found.v1")
            }
            ErrorCode::RentalAlreadyReturned => def!(
                409,
                "Rental Already Returned",
                "rentals.rental.already_returned.v1"
            ),
            ErrorCode::StorageUnavailable => {
                def!(503, "Storage Unavailable", "rentals.storage.unavailable.v1")
            }
        }
    }

    /// Get the HTTP status code for this error
    pub const fn status(&self) -> u16 {
        self.def().status
    }

    pub fn code(&self) -> &'static str {
        self.def().code
    }

    /// Convert to Problem with detail (without instance/request id)
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        self.def().to_problem(detail)
    }

    /// Full response with the request path attached.
    pub fn to_response(&self, detail: impl Into<String>, instance: &str) -> ProblemResponse {
        self.to_problem(detail).with_instance(instance).into()
    }

    /// Reverse lookup from a wire code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }
}
