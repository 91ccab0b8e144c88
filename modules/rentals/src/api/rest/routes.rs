use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};
use crate::domain::service::Service;

#[derive(OpenApi)]
#[openapi(
    info(title = "RentDesk API", description = "Customer records and the rental lifecycle"),
    paths(
        handlers::create_customer,
        handlers::list_customers,
        handlers::get_customer,
        handlers::update_customer,
        handlers::delete_customer,
        handlers::list_customer_rentals,
        handlers::open_rental,
        handlers::list_rentals,
        handlers::get_rental,
        handlers::return_rental,
    ),
    components(schemas(
        dto::ActiveFlag,
        dto::CustomerDto,
        dto::RentalDto,
        dto::CreateCustomerReq,
        dto::UpdateCustomerReq,
        dto::OpenRentalReq,
        dto::MessageResp,
        dto::CustomerCreatedResp,
        dto::CustomerResp,
        dto::CustomerListResp,
        dto::RentalCreatedResp,
        dto::RentalResp,
        dto::RentalReturnedResp,
        dto::CustomerRentalsResp,
        dto::RentalListResp,
        apikit::Problem,
        apikit::ValidationError,
    )),
    tags(
        (name = "customers", description = "Customer records"),
        (name = "rentals", description = "Rental lifecycle")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Mount the `/api/v1` routes and `/openapi.json` on `router`.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let api = Router::new()
        .route(
            "/api/v1/customers",
            post(handlers::create_customer).get(handlers::list_customers),
        )
        .route(
            "/api/v1/customers/{id}",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route(
            "/api/v1/customers/{id}/rentals",
            get(handlers::list_customer_rentals),
        )
        .route(
            "/api/v1/rentals",
            post(handlers::open_rental).get(handlers::list_rentals),
        )
        .route("/api/v1/rentals/{id}", get(handlers::get_rental))
        .route("/api/v1/rentals/{id}/return", put(handlers::return_rental))
        .layer(Extension(service));

    router
        .merge(api)
        .route("/openapi.json", get(openapi_json))
}
