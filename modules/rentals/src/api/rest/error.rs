use apikit::{Problem, ProblemContext, ProblemResponse, ValidationError};
use query_core::PageError;

use crate::domain::error::DomainError;
use crate::errors::ErrorCode;

fn pointer(field: &str) -> String {
    if field == "body" {
        String::new()
    } else {
        format!("/{field}")
    }
}

/// Map a domain error to its catalog problem.
pub fn domain_problem(e: &DomainError) -> Problem {
    match e {
        DomainError::CustomerNotFound { .. } => ErrorCode::CustomerNotFound.to_problem(e.to_string()),
        DomainError::RentalNotFound { .. } => ErrorCode::RentalNotFound.to_problem(e.to_string()),
        DomainError::AlreadyReturned { .. } => {
            ErrorCode::RentalAlreadyReturned.to_problem(e.to_string())
        }
        DomainError::Validation { field, message } => ErrorCode::RequestValidation
            .to_problem(e.to_string())
            .with_errors(vec![ValidationError::new(pointer(field), message.clone())]),
        DomainError::InvalidPagination(p) => pagination_problem(p),
        DomainError::Storage { message } => ErrorCode::StorageUnavailable.to_problem(message.clone()),
    }
}

fn pagination_problem(p: &PageError) -> Problem {
    let field = match p {
        PageError::NegativeLimit(_) => "/limit",
        PageError::NegativeOffset(_) => "/offset",
    };
    ErrorCode::RequestInvalidPagination
        .to_problem(p.to_string())
        .with_errors(vec![ValidationError::new(field, "must be a non-negative integer")])
}

/// Map domain error to RFC9457 ProblemResponse
pub fn map_domain_error(e: &DomainError, ctx: &ProblemContext) -> ProblemResponse {
    ctx.respond(domain_problem(e))
}

/// Body or path failed shape checks before reaching the service.
pub fn invalid_request(errors: Vec<ValidationError>, ctx: &ProblemContext) -> ProblemResponse {
    let detail = errors
        .iter()
        .map(|e| {
            if e.pointer.is_empty() {
                e.detail.clone()
            } else {
                format!("{}: {}", e.pointer.trim_start_matches('/'), e.detail)
            }
        })
        .collect::<Vec<_>>()
        .join("; ");
    ctx.respond(
        ErrorCode::RequestValidation
            .to_problem(detail)
            .with_errors(errors),
    )
}

/// Query string could not be decoded (e.g. `limit=abc`).
pub fn invalid_query(detail: impl Into<String>, ctx: &ProblemContext) -> ProblemResponse {
    ctx.respond(ErrorCode::RequestInvalidPagination.to_problem(detail))
}
