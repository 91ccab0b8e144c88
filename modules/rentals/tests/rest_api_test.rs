mod common;

use axum::http::StatusCode;
use common::{json_request, read_json, router};
use serde_json::{json, Value};
use tower::ServiceExt;

const PROBLEM_JSON: &str = "application/problem+json";

async fn call(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Option<String>, Value) {
    let resp = app
        .clone()
        .oneshot(json_request(method, uri, body))
        .await
        .unwrap();
    read_json(resp).await
}

async fn create(app: &axum::Router, body: Value) -> i64 {
    let (status, _, v) = call(app, "POST", "/api/v1/customers", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{v}");
    v["customer_id"].as_i64().unwrap()
}

fn assert_problem(status: StatusCode, ct: &Option<String>, v: &Value, expected: StatusCode, code: &str) {
    assert_eq!(status, expected, "{v}");
    assert_eq!(ct.as_deref(), Some(PROBLEM_JSON));
    assert_eq!(v["status"], expected.as_u16());
    assert_eq!(v["code"], code);
    assert_eq!(v["type"], format!("https://errors.rentdesk.dev/{code}"));
    assert!(v["request_id"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn customer_endpoints_roundtrip() {
    let app = router().await;

    let (status, _, v) = call(
        &app,
        "POST",
        "/api/v1/customers",
        Some(json!({"first_name": "MARY", "last_name": "SMITH", "store_id": 1, "active": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(v["status"], "ok");
    assert_eq!(v["message"], "Customer created");
    let id = v["customer_id"].as_i64().unwrap();

    let (status, _, v) = call(&app, "GET", &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let c = &v["customer"];
    assert_eq!(c["first_name"], "MARY");
    assert_eq!(c["email"], Value::Null);
    assert_eq!(c["active"], true);
    assert_eq!(c["create_date"], c["last_update"]);
    // "YYYY-MM-DD HH:MM:SS"
    assert_eq!(c["create_date"].as_str().map(str::len), Some(19));

    let (status, _, _) = call(
        &app,
        "PUT",
        &format!("/api/v1/customers/{id}"),
        Some(json!({"email": "mary@example.com", "store_id": null, "active": false})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, v) = call(&app, "GET", &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(v["customer"]["email"], "mary@example.com");
    assert_eq!(v["customer"]["store_id"], Value::Null);
    assert_eq!(v["customer"]["active"], false);
    assert_eq!(v["customer"]["last_name"], "SMITH");

    let (status, _, v) = call(&app, "DELETE", &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["status"], "ok");

    let (status, ct, v) = call(&app, "GET", &format!("/api/v1/customers/{id}"), None).await;
    assert_problem(status, &ct, &v, StatusCode::NOT_FOUND, "rentals.customer.not_found.v1");
    assert_eq!(v["instance"], format!("/api/v1/customers/{id}"));
}

#[tokio::test]
async fn listing_customers_with_filters_and_pages() {
    let app = router().await;
    create(&app, json!({"first_name": "Ann", "last_name": "Lee"})).await;
    create(&app, json!({"first_name": "Ann", "last_name": "Smith"})).await;
    create(&app, json!({"first_name": "Bob", "last_name": "Lee"})).await;

    let (status, _, v) = call(&app, "GET", "/api/v1/customers?first_name=ANN&last_name=lee", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["count"], 1);
    assert_eq!(v["total"], 1);
    assert_eq!(v["customers"][0]["last_name"], "Lee");

    let (_, _, v) = call(&app, "GET", "/api/v1/customers?limit=2&offset=1", None).await;
    assert_eq!(v["count"], 2);
    assert_eq!(v["total"], 3);
    assert_eq!(v["limit"], 2);
    assert_eq!(v["offset"], 1);
    assert_eq!(v["customers"][0]["customer_id"], 2);

    let (_, _, v) = call(&app, "GET", "/api/v1/customers?limit=0", None).await;
    assert_eq!(v["count"], 0);
    assert_eq!(v["total"], 3);

    let (status, ct, v) = call(&app, "GET", "/api/v1/customers?limit=-5", None).await;
    assert_problem(status, &ct, &v, StatusCode::BAD_REQUEST, "rentals.request.invalid_pagination.v1");

    let (status, ct, v) = call(&app, "GET", "/api/v1/customers?offset=abc", None).await;
    assert_problem(status, &ct, &v, StatusCode::BAD_REQUEST, "rentals.request.invalid_pagination.v1");
}

#[tokio::test]
async fn malformed_customer_bodies_are_rejected() {
    let app = router().await;

    for body in [json!({}), json!([1, 2]), json!({"active": 7})] {
        let (status, ct, v) = call(&app, "POST", "/api/v1/customers", Some(body)).await;
        assert_problem(status, &ct, &v, StatusCode::BAD_REQUEST, "rentals.request.validation.v1");
    }

    let (status, ct, v) = call(&app, "POST", "/api/v1/customers", None).await;
    assert_problem(status, &ct, &v, StatusCode::BAD_REQUEST, "rentals.request.validation.v1");

    let id = create(&app, json!({"first_name": "Ann"})).await;
    let (status, ct, v) = call(&app, "PUT", &format!("/api/v1/customers/{id}"), Some(json!({"active": null}))).await;
    assert_problem(status, &ct, &v, StatusCode::BAD_REQUEST, "rentals.request.validation.v1");

    let (status, ct, v) = call(&app, "GET", "/api/v1/customers/not-a-number", None).await;
    assert_problem(status, &ct, &v, StatusCode::BAD_REQUEST, "rentals.request.validation.v1");
    assert_eq!(v["errors"][0]["pointer"], "/id");
}

#[tokio::test]
async fn customer_body_with_only_nulls_creates_a_blank_customer() {
    let app = router().await;

    let id = create(&app, json!({"first_name": null})).await;
    let (status, _, v) = call(&app, "GET", &format!("/api/v1/customers/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["customer"]["first_name"], Value::Null);
    assert_eq!(v["customer"]["active"], true);

    let (status, ct, v) = call(&app, "POST", "/api/v1/customers", Some(json!({}))).await;
    assert_problem(status, &ct, &v, StatusCode::BAD_REQUEST, "rentals.request.validation.v1");
    assert_eq!(v["detail"], "at least one customer field is required");

    let (status, ct, v) = call(&app, "PUT", &format!("/api/v1/customers/{id}"), Some(json!({}))).await;
    assert_problem(status, &ct, &v, StatusCode::BAD_REQUEST, "rentals.request.validation.v1");
}

#[tokio::test]
async fn rental_open_and_return_flow() {
    let app = router().await;
    let customer_id = create(&app, json!({"first_name": "Linda"})).await;

    let (status, _, v) = call(
        &app,
        "POST",
        "/api/v1/rentals",
        Some(json!({"inventory_id": 10, "customer_id": customer_id, "staff_id": 2})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(v["message"], "Rental created");
    let rental_id = v["rental_id"].as_i64().unwrap();

    let (_, _, v) = call(&app, "GET", &format!("/api/v1/rentals/{rental_id}"), None).await;
    assert_eq!(v["rental"]["return_date"], Value::Null);
    assert_eq!(v["rental"]["staff_id"], 2);

    let uri = format!("/api/v1/rentals/{rental_id}/return");
    let (status, _, v) = call(&app, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["message"], format!("Rental {rental_id} returned"));
    let returned_at = v["rental"]["return_date"].clone();
    assert!(returned_at.is_string());
    assert_eq!(v["rental"]["last_update"], returned_at);

    let (status, ct, v) = call(&app, "PUT", &uri, None).await;
    assert_problem(status, &ct, &v, StatusCode::CONFLICT, "rentals.rental.already_returned.v1");
    assert_eq!(v["instance"], uri);

    let (_, _, v) = call(&app, "GET", &format!("/api/v1/rentals/{rental_id}"), None).await;
    assert_eq!(v["rental"]["return_date"], returned_at);

    let (status, ct, v) = call(&app, "PUT", "/api/v1/rentals/999/return", None).await;
    assert_problem(status, &ct, &v, StatusCode::NOT_FOUND, "rentals.rental.not_found.v1");

    let (_, _, v) = call(&app, "GET", &format!("/api/v1/customers/{customer_id}/rentals"), None).await;
    assert_eq!(v["count"], 1);
    assert_eq!(v["rentals"][0]["rental_id"], rental_id);

    let (status, _, v) = call(&app, "GET", "/api/v1/customers/4040/rentals", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["count"], 0);

    let (_, _, v) = call(&app, "GET", "/api/v1/rentals?limit=10", None).await;
    assert_eq!(v["total"], 1);
    assert_eq!(v["limit"], 10);
}

#[tokio::test]
async fn open_rental_lists_missing_fields() {
    let app = router().await;
    let (status, ct, v) = call(&app, "POST", "/api/v1/rentals", Some(json!({"customer_id": 1}))).await;
    assert_problem(status, &ct, &v, StatusCode::BAD_REQUEST, "rentals.request.validation.v1");

    let pointers: Vec<&str> = v["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["pointer"].as_str())
        .collect();
    assert_eq!(pointers, vec!["/inventory_id", "/staff_id"]);
}

#[tokio::test]
async fn openapi_document_lists_routes() {
    let app = router().await;
    let (status, _, v) = call(&app, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);

    let paths = v["paths"].as_object().unwrap();
    for p in [
        "/api/v1/customers",
        "/api/v1/customers/{id}",
        "/api/v1/customers/{id}/rentals",
        "/api/v1/rentals",
        "/api/v1/rentals/{id}",
        "/api/v1/rentals/{id}/return",
    ] {
        assert!(paths.contains_key(p), "missing {p}");
    }
    assert!(v["components"]["schemas"]["Problem"].is_object());
}
