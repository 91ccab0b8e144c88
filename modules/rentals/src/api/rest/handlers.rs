use std::sync::Arc;

use apikit::{Problem, ProblemContext, ProblemResponse, ValidationError};
use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query,
    },
    http::StatusCode,
    response::Json,
    Extension,
};
use query_core::PageParams;
use tracing::{error, info};

use crate::api::rest::dto::{
    parse_body, parse_fields, CreateCustomerReq, CustomerCreatedResp, CustomerListResp, CustomerRentalsResp,
    CustomerResp, ListCustomersQuery, ListRentalsQuery, MessageResp, OpenRentalReq,
    RentalCreatedResp, RentalListResp, RentalResp, RentalReturnedResp, UpdateCustomerReq,
};
use crate::api::rest::error::{invalid_query, invalid_request, map_domain_error};
use crate::contract::model::{CustomerFilter, CustomerPatch, NewCustomer, NewRental};
use crate::domain::service::Service;

type Svc = Extension<Arc<Service>>;

fn path_id(
    path: Result<Path<i32>, PathRejection>,
    ctx: &ProblemContext,
) -> Result<i32, ProblemResponse> {
    path.map(|Path(id)| id).map_err(|e| {
        invalid_request(
            vec![ValidationError::new("/id", format!("must be an integer: {}", e.body_text()))],
            ctx,
        )
    })
}

fn query<T>(
    q: Result<Query<T>, QueryRejection>,
    ctx: &ProblemContext,
) -> Result<T, ProblemResponse> {
    q.map(|Query(q)| q)
        .map_err(|e| invalid_query(e.body_text(), ctx))
}

fn body<T, D>(
    parsed: Result<T, Vec<ValidationError>>,
    ctx: &ProblemContext,
) -> Result<D, ProblemResponse>
where
    D: TryFrom<T, Error = Vec<ValidationError>>,
{
    parsed
        .and_then(D::try_from)
        .map_err(|errs| invalid_request(errs, ctx))
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/api/v1/customers",
    tag = "customers",
    request_body = CreateCustomerReq,
    responses(
        (status = 201, description = "Customer created", body = CustomerCreatedResp),
        (status = 400, description = "Missing or malformed body", body = Problem, content_type = "application/problem+json"),
        (status = 503, description = "Storage unavailable", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn create_customer(
    Extension(svc): Svc,
    ctx: ProblemContext,
    raw: Bytes,
) -> Result<(StatusCode, Json<CustomerCreatedResp>), ProblemResponse> {
    let new: NewCustomer = body(parse_fields::<CreateCustomerReq>(&raw), &ctx)?;
    info!("Creating customer");

    match svc.create_customer(new).await {
        Ok(c) => Ok((
            StatusCode::CREATED,
            Json(CustomerCreatedResp::new(c.customer_id)),
        )),
        Err(e) => {
            error!("Failed to create customer: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// List customers with filters and pagination
#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "customers",
    params(ListCustomersQuery),
    responses(
        (status = 200, description = "Page of customers", body = CustomerListResp),
        (status = 400, description = "Invalid pagination", body = Problem, content_type = "application/problem+json"),
        (status = 503, description = "Storage unavailable", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_customers(
    Extension(svc): Svc,
    ctx: ProblemContext,
    q: Result<Query<ListCustomersQuery>, QueryRejection>,
) -> Result<Json<CustomerListResp>, ProblemResponse> {
    let q = query(q, &ctx)?;
    info!("Listing customers with query: {:?}", q);

    let filter = CustomerFilter::from_params(
        q.first_name.as_deref(),
        q.last_name.as_deref(),
        q.email.as_deref(),
    );
    match svc
        .list_customers(filter, PageParams::new(q.limit, q.offset))
        .await
    {
        Ok(page) => Ok(Json(page.into())),
        Err(e) => {
            error!("Failed to list customers: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Get a customer by id
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found", body = CustomerResp),
        (status = 404, description = "Customer not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_customer(
    Extension(svc): Svc,
    ctx: ProblemContext,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<CustomerResp>, ProblemResponse> {
    let id = path_id(id, &ctx)?;
    info!("Getting customer with id: {}", id);

    match svc.get_customer(id).await {
        Ok(c) => Ok(Json(c.into())),
        Err(e) => {
            error!("Failed to get customer {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Partially update a customer
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = UpdateCustomerReq,
    responses(
        (status = 200, description = "Customer updated", body = MessageResp),
        (status = 400, description = "Missing or malformed body", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Customer not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn update_customer(
    Extension(svc): Svc,
    ctx: ProblemContext,
    id: Result<Path<i32>, PathRejection>,
    raw: Bytes,
) -> Result<Json<MessageResp>, ProblemResponse> {
    let id = path_id(id, &ctx)?;
    let patch: CustomerPatch = body(parse_fields::<UpdateCustomerReq>(&raw), &ctx)?;
    info!("Updating customer {} with: {:?}", id, patch);

    match svc.update_customer(id, patch).await {
        Ok(_) => Ok(Json(MessageResp::new(format!("Customer {id} updated")))),
        Err(e) => {
            error!("Failed to update customer {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Delete a customer
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer deleted", body = MessageResp),
        (status = 404, description = "Customer not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn delete_customer(
    Extension(svc): Svc,
    ctx: ProblemContext,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<MessageResp>, ProblemResponse> {
    let id = path_id(id, &ctx)?;
    info!("Deleting customer: {}", id);

    match svc.delete_customer(id).await {
        Ok(()) => Ok(Json(MessageResp::new(format!("Customer {id} deleted")))),
        Err(e) => {
            error!("Failed to delete customer {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Rentals of one customer, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/customers/{id}/rentals",
    tag = "rentals",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Rentals of the customer, possibly empty", body = CustomerRentalsResp)
    )
)]
pub async fn list_customer_rentals(
    Extension(svc): Svc,
    ctx: ProblemContext,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<CustomerRentalsResp>, ProblemResponse> {
    let id = path_id(id, &ctx)?;
    info!("Listing rentals of customer {}", id);

    match svc.list_customer_rentals(id).await {
        Ok(rentals) => Ok(Json(rentals.into())),
        Err(e) => {
            error!("Failed to list rentals of customer {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Open a rental
#[utoipa::path(
    post,
    path = "/api/v1/rentals",
    tag = "rentals",
    request_body = OpenRentalReq,
    responses(
        (status = 201, description = "Rental opened", body = RentalCreatedResp),
        (status = 400, description = "Missing body or reference", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn open_rental(
    Extension(svc): Svc,
    ctx: ProblemContext,
    raw: Bytes,
) -> Result<(StatusCode, Json<RentalCreatedResp>), ProblemResponse> {
    let new: NewRental = body(parse_body::<OpenRentalReq>(&raw), &ctx)?;
    info!("Opening rental: {:?}", new);

    match svc.open_rental(new).await {
        Ok(r) => Ok((StatusCode::CREATED, Json(RentalCreatedResp::new(r.rental_id)))),
        Err(e) => {
            error!("Failed to open rental: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// List rentals with pagination
#[utoipa::path(
    get,
    path = "/api/v1/rentals",
    tag = "rentals",
    params(ListRentalsQuery),
    responses(
        (status = 200, description = "Page of rentals", body = RentalListResp),
        (status = 400, description = "Invalid pagination", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn list_rentals(
    Extension(svc): Svc,
    ctx: ProblemContext,
    q: Result<Query<ListRentalsQuery>, QueryRejection>,
) -> Result<Json<RentalListResp>, ProblemResponse> {
    let q = query(q, &ctx)?;
    info!("Listing rentals with query: {:?}", q);

    match svc.list_rentals(PageParams::new(q.limit, q.offset)).await {
        Ok(page) => Ok(Json(page.into())),
        Err(e) => {
            error!("Failed to list rentals: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Get a rental by id
#[utoipa::path(
    get,
    path = "/api/v1/rentals/{id}",
    tag = "rentals",
    params(("id" = i32, Path, description = "Rental id")),
    responses(
        (status = 200, description = "Rental found", body = RentalResp),
        (status = 404, description = "Rental not found", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn get_rental(
    Extension(svc): Svc,
    ctx: ProblemContext,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<RentalResp>, ProblemResponse> {
    let id = path_id(id, &ctx)?;
    info!("Getting rental with id: {}", id);

    match svc.get_rental(id).await {
        Ok(r) => Ok(Json(r.into())),
        Err(e) => {
            error!("Failed to get rental {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Mark a rental returned
#[utoipa::path(
    put,
    path = "/api/v1/rentals/{id}/return",
    tag = "rentals",
    params(("id" = i32, Path, description = "Rental id")),
    responses(
        (status = 200, description = "Rental returned", body = RentalReturnedResp),
        (status = 404, description = "Rental not found", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Rental already returned", body = Problem, content_type = "application/problem+json")
    )
)]
pub async fn return_rental(
    Extension(svc): Svc,
    ctx: ProblemContext,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<RentalReturnedResp>, ProblemResponse> {
    let id = path_id(id, &ctx)?;
    info!("Returning rental: {}", id);

    match svc.close_rental(id).await {
        Ok(r) => Ok(Json(r.into())),
        Err(e) => {
            error!("Failed to return rental {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}
