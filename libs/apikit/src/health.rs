use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Router exposing `GET /health`.
pub fn router() -> Router {
    Router::new().route("/health", get(health_check))
}
