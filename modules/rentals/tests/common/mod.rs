#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use db::{ConnectOpts, DbHandle};
use rentals::config::RentalsConfig;
use rentals::domain::service::Service;
use rentals::RentalsModule;
use serde_json::Value;

/// Fresh in-memory database with the schema applied.
pub async fn memory_module() -> RentalsModule {
    memory_module_with(RentalsConfig::default()).await
}

pub async fn memory_module_with(cfg: RentalsConfig) -> RentalsModule {
    let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default())
        .await
        .expect("Failed to connect to test database");
    RentalsModule::init(&db, &cfg)
        .await
        .expect("Failed to initialize rentals module")
}

pub async fn service() -> Arc<Service> {
    memory_module().await.service()
}

pub async fn router() -> Router {
    let module = memory_module().await;
    apikit::HttpLayers::default().apply(module.register_rest(Router::new()))
}

pub fn json_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(resp: Response) -> (StatusCode, Option<String>, Value) {
    let status = resp.status();
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let v = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, content_type, v)
}
